//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur when generating embeddings.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Invalid response from the provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The request did not complete within the configured deadline.
    #[error("embedding request timed out")]
    Timeout,

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
