//! Tracks flows triggered over HTTP and executed in the background.
//!
//! Every triggered flow gets an execution record that moves from `pending`
//! to `running` and finally to `completed` or `failed`. Callers receive the
//! execution ID immediately and poll for the outcome.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod config;
pub mod execution;
pub mod flow;
pub mod server;

pub use self::config::Config;
