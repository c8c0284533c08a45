//! Blob retrieval for the two workbook files.
//!
//! The object store is any HTTP(S) endpoint serving
//! `GET {endpoint}/{bucket}/{key}`, such as a public bucket or a
//! MinIO-style development endpoint. Provider authentication is out of
//! scope; a failed or empty fetch aborts the run before any graph
//! write.

use rigtwin_core::config::SourceConfig;

use crate::error::{IngestError, Result};

/// Thin wrapper around the blob endpoint holding the two workbooks.
pub struct ObjectStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
}

impl ObjectStore {
    pub fn new(source: &SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: source.endpoint.trim_end_matches('/').to_string(),
            bucket: source.bucket.clone(),
        }
    }

    /// Fetch one object's bytes. Non-success status and empty bodies are
    /// both fatal: there is nothing to load without the workbook.
    pub async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);
        tracing::info!(url = %url, "Fetching workbook");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Fetch {
                key: key.to_string(),
                reason: format!("status {status}"),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(IngestError::Fetch {
                key: key.to_string(),
                reason: "empty object body".to_string(),
            });
        }

        tracing::info!(key = %key, bytes = bytes.len(), "Workbook fetched");
        Ok(bytes)
    }
}
