//! Implementation of flowstate CLI commands.

pub mod config;
pub mod flows;
pub mod run;
pub mod server;
