//! Identifier error types

use thiserror::Error;

/// Errors raised by the identifier layer
///
/// An unknown virtual identifier is recoverable by re-listing, while a
/// malformed composite identifier means the caller handed us garbage (or
/// upstream data is corrupt). Callers must not collapse one into the other.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error(
        "ID '{virtual_id}' not found. Call list_accounts, list_calendars, \
         or list_events first."
    )]
    NotFound { virtual_id: String },

    #[error("Malformed composite ID: {reason}")]
    Malformed { reason: String },
}

pub type IdResult<T> = Result<T, IdError>;
