//! Error types for morgen-api

use thiserror::Error;

/// morgen-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Rate limit exceeded. Retry after {retry_after} seconds.")]
    RateLimited { retry_after: String },

    #[error("Authentication failed. Check your API key.")]
    AuthFailed,

    #[error("Access forbidden. You may not have permission for this operation.")]
    Forbidden,

    #[error("API error: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// HTTP status code associated with the error, when one exists
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::AuthFailed => Some(401),
            Self::Forbidden => Some(403),
            Self::Upstream { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Configuration(_) => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
