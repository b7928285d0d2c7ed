//! The retrieval engine.
//!
//! Orchestrates the listing cache, the embedding cache, and cosine
//! ranking into the two operations the bot consumes: [`search`] for
//! scored candidates and [`search_files`] for the selected files' raw
//! bytes.
//!
//! [`search`]: RetrievalEngine::search
//! [`search_files`]: RetrievalEngine::search_files

use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use ragbot_drive::FileStore;
use ragbot_embeddings::{cosine_similarity, EmbeddingProvider};

use crate::clock::{Clock, SystemClock};
use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::index::{EmbeddingCache, IndexEntry};
use crate::listing::ListingCache;

/// A candidate scored against the query.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// Cosine similarity between the query and the entry, in [-1, 1].
    pub score: f32,

    /// The matched index entry.
    pub entry: IndexEntry,
}

/// A retrieved file packaged for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    /// Store identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Media type as reported by the listing.
    pub media_type: String,

    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Semantic retrieval over the knowledge folder.
///
/// The engine owns both caches; collaborators (store, provider, clock)
/// are injected so tests can drive it with fakes and a manual clock.
pub struct RetrievalEngine {
    store: Arc<dyn FileStore>,
    provider: Arc<dyn EmbeddingProvider>,
    listing: ListingCache,
    index: EmbeddingCache,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    /// Create an engine on the system clock.
    pub fn new(
        store: Arc<dyn FileStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self::with_clock(store, provider, config, Arc::new(SystemClock))
    }

    /// Create an engine with an injected clock.
    pub fn with_clock(
        store: Arc<dyn FileStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let listing = ListingCache::new(config.listing_ttl(), Arc::clone(&clock));
        let index = EmbeddingCache::new(config.embedding_ttl(), clock);
        Self {
            store,
            provider,
            listing,
            index,
            config,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Rank the knowledge folder against `query` and return the top
    /// `top_k` candidates, best first.
    ///
    /// Degrades to an empty result rather than failing: an empty
    /// folder, a contentless query, and a query-embedding failure all
    /// mean "nothing to match". Only a listing failure is an error.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredCandidate>> {
        let files = self.listing.get_or_refresh(self.store.as_ref()).await?;
        if files.is_empty() {
            debug!("knowledge folder is empty");
            return Ok(Vec::new());
        }

        let query_embedding = match self.provider.embed(query).await {
            Ok(Some(embedding)) => embedding,
            Ok(None) => {
                debug!("contentless query, nothing to match");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!("query embedding failed, treating as no match: {err}");
                return Ok(Vec::new());
            }
        };

        let mut candidates: Vec<ScoredCandidate> = Vec::new();
        for record in &files {
            let entry = match self
                .index
                .get_or_build(record, self.store.as_ref(), self.provider.as_ref())
                .await
            {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping file {} ({}): {err}", record.id, record.name);
                    continue;
                }
            };

            let Some(embedding) = entry.embedding.as_ref() else {
                continue;
            };
            let Some(score) = cosine_similarity(&query_embedding, embedding) else {
                debug!("similarity undefined for file {}", entry.file_id);
                continue;
            };

            candidates.push(ScoredCandidate { score, entry });
        }

        // Stable sort: equal scores keep their listing order.
        candidates.sort_by(|a, b| OrderedFloat(b.score).cmp(&OrderedFloat(a.score)));
        candidates.truncate(top_k);

        debug!("ranked {} candidates for query", candidates.len());
        Ok(candidates)
    }

    /// Run [`search`] with the configured top-K, then download the raw
    /// bytes of each selected file.
    ///
    /// This is a second fetch, separate from the one that fed text
    /// extraction; callers get the files as stored. A file whose
    /// re-download fails is dropped with a warning and does not affect
    /// the others.
    ///
    /// [`search`]: RetrievalEngine::search
    pub async fn search_files(&self, query: &str) -> Result<Vec<RetrievedFile>> {
        let candidates = self.search(query, self.config.top_k).await?;

        let mut files = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let entry = candidate.entry;
            match self.store.download(&entry.file_id).await {
                Ok(bytes) => files.push(RetrievedFile {
                    id: entry.file_id,
                    name: entry.name,
                    media_type: entry.media_type,
                    bytes,
                }),
                Err(err) => {
                    warn!("dropping result {} ({}): {err}", entry.file_id, entry.name);
                }
            }
        }

        Ok(files)
    }
}
