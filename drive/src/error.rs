//! Error types for file store access.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the file store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store rejected the request.
    #[error("store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The request did not complete within the configured deadline.
    #[error("store request timed out")]
    Timeout,

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
