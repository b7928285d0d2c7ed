//! # Drive
//!
//! Read-only access to the knowledge-base folder in Google Drive:
//! listing the folder's files and downloading their raw bytes. The
//! [`FileStore`] trait is the seam the retrieval engine depends on;
//! [`DriveClient`] is its Drive v3 implementation.
//!
//! Authentication uses a bearer credential obtained out-of-band; token
//! acquisition and refresh are not this crate's concern.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::DriveClient;
pub use error::{Result, StoreError};

/// A file as reported by the store's folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque identifier, unique within the store.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Media type classifying the content format.
    #[serde(rename = "mimeType")]
    pub media_type: String,
}

/// Read-only file store operations used by retrieval.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List all non-trashed files directly under the configured folder.
    async fn list_folder(&self) -> Result<Vec<FileRecord>>;

    /// Download the raw bytes of a file.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}
