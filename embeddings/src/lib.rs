//! # Embeddings
//!
//! This crate turns text into dense vectors and scores vectors against
//! each other. It is the only part of the system that talks to the
//! embedding service.
//!
//! - **Provider**: the [`EmbeddingProvider`] trait plus the
//!   [`OpenAiProvider`] adapter for the OpenAI embeddings API
//! - **Similarity**: cosine scoring used by the retrieval engine
//!
//! Empty or whitespace-only input never reaches the network: `embed`
//! returns `Ok(None)` for it, and callers treat that as "nothing to
//! match" rather than an error.

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, OpenAiProvider};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Model used for all embedding requests.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Dimension of vectors produced by [`EMBEDDING_MODEL`].
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Maximum number of characters sent to the embedding service per call.
///
/// Longer input is truncated before the request to bound cost and
/// latency; the tail of a long document contributes little to its
/// semantic fingerprint.
pub const MAX_EMBED_CHARS: usize = 15_000;
