//! Implementation of the `run` subcommand.

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;

use crate::config::Config;
use crate::execution::ExecutionRunner;
use crate::execution::ExecutionStatus;
use crate::execution::MemoryStore;
use crate::execution::QueryService;
use crate::flow::Flow;
use crate::flow::FlowError;
use crate::flow::PoemFlow;
use crate::flow::poem::PoemOverrides;

/// Arguments to the `run` subcommand.
#[derive(Parser, Debug)]
pub struct Args {
    /// The name of the flow to run.
    #[arg(value_name = "FLOW")]
    pub flow: String,

    /// The number of sentences to write (`poem_flow` only).
    #[arg(long)]
    pub sentence_count: Option<u8>,
}

/// The main function for the `run` subcommand.
///
/// The flow is executed in-process through the same runner the server uses,
/// and the final execution record is printed as JSON.
pub async fn run(args: Args, config: Config) -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let runner = ExecutionRunner::new(store.clone(), config.execution.max_concurrent_executions);

    let submission = if args.flow == PoemFlow::NAME {
        runner
            .submit::<PoemFlow>(PoemOverrides {
                sentence_count: args.sentence_count,
            })
            .await?
    } else {
        return Err(FlowError::Unknown(args.flow).into());
    };

    let id = submission.id;
    submission
        .handle
        .await
        .context("execution task did not finish")?;

    let record = QueryService::new(store).get(id).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("failed to serialize execution")?
    );

    if record.status == ExecutionStatus::Failed {
        bail!(
            "execution `{id}` failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}
