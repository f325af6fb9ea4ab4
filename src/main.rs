//! The flowstate command line tool.

use std::io::IsTerminal;
use std::io::stderr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::InfoLevel;
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use flowstate::Config;
use flowstate::commands;
use git_testament::git_testament;
use git_testament::render_testament;
use tracing::debug;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

git_testament!(TESTAMENT);

#[derive(Subcommand)]
enum Commands {
    /// Starts the HTTP server.
    Server(commands::server::Args),

    /// Runs a flow to completion and prints its execution record.
    Run(commands::run::Args),

    /// Lists the available flows.
    Flows,

    /// Displays or initializes the configuration.
    Config(commands::config::Args),
}

#[derive(Parser)]
#[command(author, version = render_testament!(TESTAMENT), propagate_version = true, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file (default: `flowstate.toml` if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

pub async fn inner() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.log_level_filter().as_trace().into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment from `{}`", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("failed to load `.env`"),
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Server(args) => commands::server::server(args, config).await,
        Commands::Run(args) => commands::run::run(args, config).await,
        Commands::Flows => {
            commands::flows::flows();
            Ok(())
        }
        Commands::Config(args) => commands::config::config(args, config),
    }
}

#[tokio::main]
pub async fn main() {
    if let Err(e) = inner().await {
        eprintln!(
            "{error}: {e:?}",
            error = if std::io::stderr().is_terminal() {
                "error".red().bold()
            } else {
                "error".normal()
            }
        );
        std::process::exit(1);
    }
}
