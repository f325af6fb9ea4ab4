//! Implementation of the `server` subcommand.

use anyhow::Result;
use clap::Parser;

use crate::config::Config;

/// Arguments to the `server` subcommand.
#[derive(Parser, Debug)]
pub struct Args {
    /// Host to bind to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to.
    #[arg(long)]
    pub port: Option<u16>,

    /// Allowed CORS origins.
    #[arg(long)]
    pub allowed_origins: Vec<String>,

    /// Maximum number of flows executing at once.
    #[arg(long)]
    pub max_concurrent_executions: Option<usize>,
}

impl Args {
    /// Applies the arguments to the configuration.
    pub fn apply(mut self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.server.host = host;
        }

        if let Some(port) = self.port {
            config.server.port = port;
        }

        if let Some(max) = self.max_concurrent_executions {
            config.execution.max_concurrent_executions = Some(max);
        }

        config
            .server
            .allowed_origins
            .append(&mut self.allowed_origins);

        config
    }
}

/// The main function for the `server` subcommand.
pub async fn server(args: Args, config: Config) -> Result<()> {
    let config = args.apply(config);
    config.validate()?;
    crate::server::run(config).await
}
