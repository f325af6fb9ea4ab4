//! Background execution of flows.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value as JsonValue;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tokio::task::JoinHandle;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use super::ExecutionStore;
use super::UpdateOutcome;
use crate::flow::Flow;
use crate::flow::FlowError;

/// A submitted execution.
#[derive(Debug)]
pub struct Submission {
    /// The execution ID.
    pub id: Uuid,
    /// The handle of the background task driving the execution.
    ///
    /// Dropping the handle detaches the task; the execution still runs to
    /// completion.
    pub handle: JoinHandle<()>,
}

/// Drives executions through their lifecycle.
///
/// The runner marks an execution `running`, executes the flow on a blocking
/// thread, and records either the flow's result or its error. Failures never
/// escape the runner; they are only observable through the store.
#[derive(Clone, Debug)]
pub struct ExecutionRunner {
    /// The store executions are recorded in.
    store: Arc<dyn ExecutionStore>,
    /// A semaphore for limiting concurrent executions.
    semaphore: Option<Arc<Semaphore>>,
}

impl ExecutionRunner {
    /// Creates a new runner.
    ///
    /// When `max_concurrent` is set, at most that many flows execute at once;
    /// the rest remain `pending` until a slot frees up.
    pub fn new(store: Arc<dyn ExecutionStore>, max_concurrent: Option<usize>) -> Self {
        Self {
            store,
            semaphore: max_concurrent.map(|max| Arc::new(Semaphore::new(max))),
        }
    }

    /// Gets the store the runner records executions in.
    pub fn store(&self) -> &Arc<dyn ExecutionStore> {
        &self.store
    }

    /// Creates an execution for a flow and starts it in the background.
    ///
    /// The overrides are validated before the execution record is created, so
    /// an invalid submission leaves nothing behind.
    pub async fn submit<F: Flow>(&self, overrides: F::Overrides) -> Result<Submission, FlowError> {
        let inputs = serde_json::to_value(&overrides)?;
        let flow = F::new(overrides)?;

        let id = self.store.create(F::NAME, inputs).await;
        let handle = self.spawn(id, flow);
        Ok(Submission { id, handle })
    }

    /// Runs an existing pending execution on a detached task.
    pub fn spawn<F: Flow>(&self, id: Uuid, flow: F) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move { runner.run(id, flow).await })
    }

    /// Runs an existing pending execution to a terminal status.
    pub async fn run<F: Flow>(&self, id: Uuid, mut flow: F) {
        let _permit = match &self.semaphore {
            Some(semaphore) => match semaphore.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    // A record only reaches a terminal status through `running`.
                    self.report(id, self.store.start(id).await);
                    let error = format!("no execution slot available: {e}");
                    warn!(%id, flow = F::NAME, %error, "execution failed");
                    self.report(id, self.store.fail(id, error).await);
                    return;
                }
            },
            None => None,
        };

        self.report(id, self.store.start(id).await);
        info!(%id, flow = F::NAME, "execution started");

        let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<JsonValue> {
            flow.execute()?;
            let output = flow
                .result()
                .with_context(|| format!("flow `{}` finished without a result", F::NAME))?;
            serde_json::to_value(output).context("failed to serialize flow result")
        })
        .await;

        match outcome {
            Ok(Ok(result)) => {
                self.report(id, self.store.complete(id, result).await);
                info!(%id, flow = F::NAME, "execution completed");
            }
            Ok(Err(e)) => {
                let error = format!("{e:#}");
                warn!(%id, flow = F::NAME, %error, "execution failed");
                self.report(id, self.store.fail(id, error).await);
            }
            Err(e) => {
                let error = join_error_message(e);
                warn!(%id, flow = F::NAME, %error, "execution aborted");
                self.report(id, self.store.fail(id, error).await);
            }
        }
    }

    /// Reports updates that the store did not apply.
    fn report(&self, id: Uuid, outcome: UpdateOutcome) {
        match outcome {
            UpdateOutcome::Applied => {}
            UpdateOutcome::NotFound => {
                warn!(%id, "execution record disappeared before it could be updated")
            }
            UpdateOutcome::Rejected { current } => {
                warn!(%id, %current, "execution record was already past the requested status")
            }
        }
    }
}

/// Describes why a blocking flow task did not return.
fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return String::from("execution was aborted before it finished");
    }

    let payload: Box<dyn Any + Send> = error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("unknown panic payload"));

    format!("flow panicked: {message}")
}
