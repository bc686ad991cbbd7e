//! CLI error types

use quotes_engine::EngineError;
use quotes_store::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings document could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
