//! Error types for the retrieval engine.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// File store error.
    #[error("store error: {0}")]
    Store(#[from] ragbot_drive::StoreError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] ragbot_embeddings::EmbeddingError),
}
