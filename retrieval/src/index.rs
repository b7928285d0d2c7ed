//! Per-file embedding cache.
//!
//! One [`IndexEntry`] per file id, built lazily (download → extract →
//! embed) and kept until its freshness window lapses. Entries are
//! replaced whole; there is no partial update. A per-file-id mutex
//! keeps recomputation single-flight so concurrent searches cannot pay
//! for the same embedding twice.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use ragbot_drive::{FileRecord, FileStore};
use ragbot_embeddings::{Embedding, EmbeddingProvider};

use crate::clock::Clock;
use crate::error::Result;

/// A cached, indexable view of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Store identifier of the file.
    pub file_id: String,

    /// Display name.
    pub name: String,

    /// Media type as reported by the listing.
    pub media_type: String,

    /// Extracted plain text (possibly empty).
    pub text: String,

    /// Semantic fingerprint of `text`.
    ///
    /// `None` exactly when the text was empty/whitespace-only or the
    /// provider call failed; such entries never reach ranking.
    pub embedding: Option<Embedding>,

    /// When the entry was built.
    pub cached_at: DateTime<Utc>,
}

/// TTL cache of [`IndexEntry`] records, keyed by file id.
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, IndexEntry>>,

    /// Per-file-id build locks: at most one embedding computation per
    /// file is in flight at any time.
    building: Mutex<HashMap<String, Arc<Mutex<()>>>>,

    /// Freshness window.
    ttl: chrono::Duration,

    clock: Arc<dyn Clock>,
}

impl EmbeddingCache {
    /// Create an empty cache with the given freshness window.
    pub fn new(ttl: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            building: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Return the cached entry for `record`, building it first if it is
    /// missing or expired.
    ///
    /// A download failure propagates and leaves the cache untouched for
    /// this file; extraction failures degrade to empty text and a
    /// provider failure degrades to an absent embedding, so both still
    /// produce an entry.
    pub async fn get_or_build(
        &self,
        record: &FileRecord,
        store: &dyn FileStore,
        provider: &dyn EmbeddingProvider,
    ) -> Result<IndexEntry> {
        if let Some(entry) = self.fresh_entry(&record.id).await {
            return Ok(entry);
        }

        let slot = {
            let mut building = self.building.lock().await;
            Arc::clone(building.entry(record.id.clone()).or_default())
        };
        let _guard = slot.lock().await;

        // Another caller may have built the entry while we waited.
        if let Some(entry) = self.fresh_entry(&record.id).await {
            return Ok(entry);
        }

        let bytes = store.download(&record.id).await?;
        let text = ragbot_extract::extract_text(&bytes, &record.media_type);

        let embedding = match provider.embed(&text).await {
            Ok(embedding) => embedding,
            Err(err) => {
                warn!(
                    "embedding failed for file {} ({}): {err}",
                    record.id, record.name
                );
                None
            }
        };

        let entry = IndexEntry {
            file_id: record.id.clone(),
            name: record.name.clone(),
            media_type: record.media_type.clone(),
            text,
            embedding,
            cached_at: self.clock.now(),
        };

        self.entries
            .write()
            .await
            .insert(record.id.clone(), entry.clone());
        debug!("indexed file {} ({})", record.id, record.name);

        Ok(entry)
    }

    async fn fresh_entry(&self, file_id: &str) -> Option<IndexEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(file_id)?;
        if self.clock.now() - entry.cached_at < self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }
}
