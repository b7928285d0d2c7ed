//! File-listing cache.
//!
//! Holds the most recent snapshot of "files in the knowledge folder"
//! and refreshes it from the store only when the snapshot is older than
//! its freshness window. A store failure during refresh propagates;
//! serving a stale or empty listing would mask it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use ragbot_drive::{FileRecord, FileStore};

use crate::clock::Clock;
use crate::error::Result;

/// The cached folder listing.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    /// Files in listing order.
    pub files: Vec<FileRecord>,

    /// When the listing was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// TTL cache around the store's folder listing.
pub struct ListingCache {
    /// Singleton snapshot, replaced whole on refresh.
    snapshot: RwLock<Option<ListingSnapshot>>,

    /// Serializes refreshes so concurrent expiries hit the store once.
    refresh: Mutex<()>,

    /// Freshness window.
    ttl: chrono::Duration,

    clock: Arc<dyn Clock>,
}

impl ListingCache {
    /// Create an empty cache with the given freshness window.
    pub fn new(ttl: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshot: RwLock::new(None),
            refresh: Mutex::new(()),
            ttl,
            clock,
        }
    }

    /// Return the cached listing, refreshing it from the store first if
    /// the snapshot is missing or expired.
    pub async fn get_or_refresh(&self, store: &dyn FileStore) -> Result<Vec<FileRecord>> {
        if let Some(files) = self.fresh_files().await {
            return Ok(files);
        }

        let _guard = self.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(files) = self.fresh_files().await {
            return Ok(files);
        }

        let files = store.list_folder().await?;
        debug!("refreshed folder listing: {} files", files.len());

        *self.snapshot.write().await = Some(ListingSnapshot {
            files: files.clone(),
            fetched_at: self.clock.now(),
        });

        Ok(files)
    }

    async fn fresh_files(&self) -> Option<Vec<FileRecord>> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;
        if self.clock.now() - snapshot.fetched_at < self.ttl {
            Some(snapshot.files.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::FakeStore;
    use pretty_assertions::assert_eq;

    fn cache(ttl_secs: i64, clock: &Arc<ManualClock>) -> ListingCache {
        let clock: Arc<dyn Clock> = clock.clone();
        ListingCache::new(chrono::Duration::seconds(ttl_secs), clock)
    }

    #[tokio::test]
    async fn serves_the_snapshot_while_fresh() {
        let clock = Arc::new(ManualClock::new());
        let store = FakeStore::new().with_file("a", "a.txt", "text/plain", b"alpha");
        let cache = cache(600, &clock);

        let first = cache.get_or_refresh(&store).await.unwrap();
        clock.advance(chrono::Duration::seconds(599));
        let second = cache.get_or_refresh(&store).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_after_expiry() {
        let clock = Arc::new(ManualClock::new());
        let store = FakeStore::new().with_file("a", "a.txt", "text/plain", b"alpha");
        let cache = cache(600, &clock);

        cache.get_or_refresh(&store).await.unwrap();
        clock.advance(chrono::Duration::seconds(600));
        cache.get_or_refresh(&store).await.unwrap();

        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn replaces_the_snapshot_wholesale() {
        let clock = Arc::new(ManualClock::new());
        let store = FakeStore::new().with_file("a", "a.txt", "text/plain", b"alpha");
        let cache = cache(600, &clock);

        cache.get_or_refresh(&store).await.unwrap();

        store.replace_files(vec![FileRecord {
            id: "b".to_string(),
            name: "b.txt".to_string(),
            media_type: "text/plain".to_string(),
        }]);
        clock.advance(chrono::Duration::seconds(601));

        let files = cache.get_or_refresh(&store).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, "b");
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let clock = Arc::new(ManualClock::new());
        let store = FakeStore::new().failing_listing();
        let cache = cache(600, &clock);

        let result = cache.get_or_refresh(&store).await;
        assert!(result.is_err());
    }
}
