//! Error types for the CLI

use relsql_core::RelsqlError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Compile or execution error
    #[error("{0}")]
    Relsql(#[from] RelsqlError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Malformed JSON argument
    #[error("invalid {what} JSON: {source}")]
    InvalidJson {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}
