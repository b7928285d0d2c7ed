//! Configuration for the retrieval engine.

use serde::{Deserialize, Serialize};

/// Freshness window for the folder listing, in seconds.
pub const DEFAULT_LISTING_TTL_SECS: u64 = 600;

/// Freshness window for cached embeddings, in seconds.
///
/// Much longer than the listing window: file contents change rarely,
/// and re-embedding a whole folder is the expensive path.
pub const DEFAULT_EMBEDDING_TTL_SECS: u64 = 86_400;

/// Number of top candidates handed to answer generation.
pub const DEFAULT_TOP_K: usize = 3;

/// Configuration for the retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Freshness window for the folder listing, in seconds.
    pub listing_ttl_secs: u64,

    /// Freshness window for per-file embeddings, in seconds.
    pub embedding_ttl_secs: u64,

    /// Number of candidates returned by `search_files`.
    pub top_k: usize,
}

impl RetrievalConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            listing_ttl_secs: DEFAULT_LISTING_TTL_SECS,
            embedding_ttl_secs: DEFAULT_EMBEDDING_TTL_SECS,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the listing freshness window.
    pub fn with_listing_ttl_secs(mut self, secs: u64) -> Self {
        self.listing_ttl_secs = secs;
        self
    }

    /// Set the embedding freshness window.
    pub fn with_embedding_ttl_secs(mut self, secs: u64) -> Self {
        self.embedding_ttl_secs = secs;
        self
    }

    /// Set the number of candidates returned by `search_files`.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub(crate) fn listing_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.listing_ttl_secs as i64)
    }

    pub(crate) fn embedding_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.embedding_ttl_secs as i64)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new()
    }
}
