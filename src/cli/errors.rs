//! CLI-specific error types
//!
//! Every CLI error is fatal: main prints it and exits non-zero. The
//! loader never swallows a failure into a clean exit.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document store error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Fixture file could not be read or validated
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// HTTP server failed to start or crashed
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error (stdout)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn fixture(msg: impl Into<String>) -> Self {
        Self::Fixture(msg.into())
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }
}
