//! Configuration for the `flowstate` command line tool.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::execution::DEFAULT_LIST_LIMIT;
use crate::execution::MAX_LIST_LIMIT;

/// The configuration file read from the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "flowstate.toml";

/// The prefix of environment variables that override configuration.
///
/// Nested keys are separated by a double underscore (e.g.
/// `FLOWSTATE__SERVER__PORT`).
pub const ENV_PREFIX: &str = "FLOWSTATE";

/// The key of the only list setting, which environment variables supply as a
/// comma-separated value.
const ALLOWED_ORIGINS_KEY: &str = "server.allowed_origins";

/// Default host.
const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port.
const DEFAULT_PORT: u16 = 8000;

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The concurrency limit is zero.
    #[error("`max_concurrent_executions` must be at least 1")]
    ZeroConcurrency,

    /// The default list limit is out of range.
    #[error("`default_list_limit` must be between 1 and {max}, got {0}", max = MAX_LIST_LIMIT)]
    ListLimitOutOfRange(usize),

    /// The host is empty.
    #[error("`host` must not be empty")]
    EmptyHost,
}

/// Represents the configuration for the `flowstate` command line tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct Config {
    /// Configuration for the HTTP server.
    pub server: ServerConfig,
    /// Configuration for executing flows.
    pub execution: ExecutionConfig,
}

/// Represents the configuration for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Host to bind to (default: `127.0.0.1`).
    pub host: String,
    /// Port to bind to (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins.
    ///
    /// `FLOWSTATE__SERVER__ALLOWED_ORIGINS` takes a comma-separated list.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            allowed_origins: Vec::new(),
        }
    }
}

/// Represents the configuration for executing flows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Maximum number of flows executing at once (default: no limit).
    ///
    /// Executions beyond the limit stay `pending` until a slot frees up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_executions: Option<usize>,
    /// Number of executions returned by a listing when no limit is given
    /// (default: `100`).
    pub default_list_limit: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_executions: None,
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Sources are layered in increasing precedence: built-in defaults, the
    /// configuration file, then `FLOWSTATE__*` environment variables. When
    /// `path` is `None`, [`DEFAULT_CONFIG_FILE`] is read if it exists; an
    /// explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };

        let config: Config = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key(ALLOWED_ORIGINS_KEY)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;

        config.validate()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.execution.max_concurrent_executions == Some(0) {
            return Err(ConfigError::ZeroConcurrency);
        }

        let limit = self.execution.default_list_limit;
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(ConfigError::ListLimitOutOfRange(limit));
        }

        Ok(())
    }
}
