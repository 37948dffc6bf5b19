//! Error mapping for tool invocations

use morgen_api::ApiError;
use morgen_core::{Error as CoreError, IdError};
use thiserror::Error;

/// Failure of a single tool invocation
///
/// Rendered with `to_string()` into the error payload handed back to the
/// model, so every message must be actionable on its own. Identifier
/// errors pass through verbatim to keep the "unknown virtual ID" and
/// "malformed composite ID" cases distinguishable.
#[derive(Debug, Error)]
pub(crate) enum ToolError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("API error (HTTP {status}): {source}")]
    Api { status: u16, source: ApiError },

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl ToolError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<ApiError> for ToolError {
    fn from(err: ApiError) -> Self {
        match err.status_code() {
            Some(status) => Self::Api {
                status,
                source: err,
            },
            None => Self::Unexpected(err.to_string()),
        }
    }
}

impl From<IdError> for ToolError {
    fn from(err: IdError) -> Self {
        Self::Core(err.into())
    }
}

/// What a tool's inner run produces: a JSON payload or a failure message
pub(crate) type ToolOutcome = std::result::Result<serde_json::Value, ToolError>;
