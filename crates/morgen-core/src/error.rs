//! Error types for morgen-core

use thiserror::Error;

use crate::ids::IdError;

/// Main error type for morgen-core
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for morgen-core
pub type Result<T> = std::result::Result<T, Error>;
