//! Drive v3 REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::{FileRecord, FileStore};

/// Default deadline for a single store request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fields requested from the listing endpoint.
const LISTING_FIELDS: &str = "files(id,name,mimeType)";

/// Google Drive v3 client scoped to a single folder.
pub struct DriveClient {
    /// Bearer credential, configured out-of-band.
    access_token: String,

    /// Identifier of the knowledge-base folder.
    folder_id: String,

    /// API base URL.
    base_url: String,

    /// Per-request deadline.
    request_timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl DriveClient {
    /// Create a new client for the given folder.
    pub fn new(access_token: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            folder_id: folder_id.into(),
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Map a transport-level failure, keeping timeouts distinguishable.
fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Http(err)
    }
}

#[async_trait]
impl FileStore for DriveClient {
    async fn list_folder(&self) -> Result<Vec<FileRecord>> {
        let query = format!("'{}' in parents and trashed = false", self.folder_id);

        let response = self
            .client
            .get(format!("{}/files", self.base_url))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .query(&[("q", query.as_str()), ("fields", LISTING_FIELDS)])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let listing: FileListing = Self::check(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        debug!("listed {} files in folder", listing.files.len());
        Ok(listing.files)
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/files/{file_id}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.access_token))
            .query(&[("alt", "media")])
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let bytes = Self::check(response)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;

        debug!("downloaded {} bytes for file {file_id}", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Listing endpoint response format.
#[derive(Debug, Deserialize)]
struct FileListing {
    #[serde(default)]
    files: Vec<FileRecord>,
}
