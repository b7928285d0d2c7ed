//! Shared fakes for retrieval tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ragbot_drive::{FileRecord, FileStore, StoreError};
use ragbot_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};

pub(crate) fn record(id: &str, name: &str, media_type: &str) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        name: name.to_string(),
        media_type: media_type.to_string(),
    }
}

/// In-memory file store with call counters.
#[derive(Default)]
pub(crate) struct FakeStore {
    files: Mutex<Vec<FileRecord>>,
    content: Mutex<HashMap<String, Vec<u8>>>,
    fail_listing: bool,
    fail_downloads: HashSet<String>,
    list_calls: AtomicUsize,
    download_calls: Mutex<HashMap<String, usize>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, id: &str, name: &str, media_type: &str, bytes: &[u8]) -> Self {
        self.files
            .lock()
            .unwrap()
            .push(record(id, name, media_type));
        self.content
            .lock()
            .unwrap()
            .insert(id.to_string(), bytes.to_vec());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_download(mut self, id: &str) -> Self {
        self.fail_downloads.insert(id.to_string());
        self
    }

    pub fn replace_files(&self, files: Vec<FileRecord>) {
        *self.files.lock().unwrap() = files;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn download_count(&self, id: &str) -> usize {
        self.download_calls
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl FileStore for FakeStore {
    async fn list_folder(&self) -> ragbot_drive::Result<Vec<FileRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(StoreError::Api {
                status: 500,
                message: "listing unavailable".to_string(),
            });
        }
        Ok(self.files.lock().unwrap().clone())
    }

    async fn download(&self, file_id: &str) -> ragbot_drive::Result<Vec<u8>> {
        *self
            .download_calls
            .lock()
            .unwrap()
            .entry(file_id.to_string())
            .or_insert(0) += 1;

        if self.fail_downloads.contains(file_id) {
            return Err(StoreError::Api {
                status: 500,
                message: "download unavailable".to_string(),
            });
        }

        self.content
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("no content for {file_id}"),
            })
    }
}

/// Embedding provider backed by a fixed text → vector table.
///
/// `requests()` counts service requests: contentless input short-circuits
/// before the counter, mirroring the real adapter.
#[derive(Default)]
pub(crate) struct FakeProvider {
    vectors: HashMap<String, Embedding>,
    fail: bool,
    requests: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, text: &str, vector: Embedding) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeProvider {
    fn model(&self) -> &str {
        "fake-embedder"
    }

    async fn embed(&self, text: &str) -> ragbot_embeddings::Result<Option<Embedding>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::ApiRequest("provider down".to_string()));
        }

        Ok(Some(
            self.vectors
                .get(trimmed)
                .cloned()
                .unwrap_or_else(|| vec![0.0, 0.0, 1.0]),
        ))
    }
}
