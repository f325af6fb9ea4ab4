//! Implementation of the `config` subcommand.

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;

use crate::config::Config;

/// Arguments for the `config` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// The `config` subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommand,
}

/// Subcommands for the `config` command.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Prints a default configuration file.
    Init,

    /// Prints the configuration after every source has been applied.
    Resolve,
}

/// Runs the `config` command.
pub fn config(args: Args, config: Config) -> anyhow::Result<()> {
    let config = match args.command {
        ConfigSubcommand::Init => Config::default(),
        ConfigSubcommand::Resolve => config,
    };

    let text = toml::to_string_pretty(&config).context("failed to serialize configuration")?;
    println!("{text}");
    Ok(())
}
