//! REST clients for the registry service
//!
//! The registry service owns uploaded files and the category vocabulary.
//! Endpoints:
//!
//! - `GET {base}/files/{id}`: descriptor row, 404 when unknown
//! - `GET {base}/files/{id}/content`: the stored bytes
//! - `GET {base}/categories?status=active`: active category rows
//!
//! Both clients authenticate with a service bearer credential. Failures here
//! are never retried automatically; the caller decides whether a repeat is
//! worth it.

use async_trait::async_trait;
use purser_domain::{CategoryRegistry, FileDescriptor, FileRegistry};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::RegistryError;

/// Default timeout for registry requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A file row as the registry service serves it
///
/// Carries more than the pipeline consumes; the extra columns stay at this
/// boundary.
#[derive(Deserialize)]
struct FileRow {
    id: String,
    #[serde(default)]
    original_name: Option<String>,
    mime_type: String,
    size_bytes: u64,
    checksum_sha256: String,
    uploaded_by: String,
    #[allow(dead_code)]
    storage_key: String,
    #[allow(dead_code)]
    created_at: String,
}

impl FileRow {
    fn into_descriptor(self) -> FileDescriptor {
        FileDescriptor {
            id: self.id,
            mime_type: self.mime_type,
            byte_size: self.size_bytes,
            content_hash: self.checksum_sha256,
            uploaded_by: self.uploaded_by,
        }
    }
}

/// A category row as the registry service serves it
#[derive(Deserialize)]
struct CategoryRow {
    name: String,
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .unwrap()
}

fn transport_error(e: reqwest::Error) -> RegistryError {
    RegistryError::Unreachable(format!("Request failed: {}", e))
}

async fn status_error(response: reqwest::Response) -> RegistryError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    RegistryError::Status { status, body }
}

/// HTTP client for file descriptors and document content
pub struct RestFileRegistry {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl RestFileRegistry {
    /// Create a client against a registry base URL with a service credential
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client: build_client(),
        }
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.base_url, file_id)
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("{}/files/{}/content", self.base_url, file_id)
    }
}

#[async_trait]
impl FileRegistry for RestFileRegistry {
    type Error = RegistryError;

    async fn descriptor(&self, file_id: &str) -> Result<Option<FileDescriptor>, Self::Error> {
        let response = self
            .client
            .get(self.file_url(file_id))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let row = response
            .json::<FileRow>()
            .await
            .map_err(|e| RegistryError::Decode(format!("file row: {}", e)))?;
        if let Some(name) = &row.original_name {
            debug!("Resolved file {} ({})", row.id, name);
        }
        Ok(Some(row.into_descriptor()))
    }

    async fn content(&self, descriptor: &FileDescriptor) -> Result<Vec<u8>, Self::Error> {
        let response = self
            .client
            .get(self.content_url(&descriptor.id))
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Decode(format!("file content: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// HTTP client for the active category vocabulary
pub struct RestCategoryRegistry {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl RestCategoryRegistry {
    /// Create a client against a registry base URL with a service credential
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client: build_client(),
        }
    }

    fn categories_url(&self) -> String {
        format!("{}/categories?status=active", self.base_url)
    }
}

#[async_trait]
impl CategoryRegistry for RestCategoryRegistry {
    type Error = RegistryError;

    async fn active_names(&self) -> Result<Vec<String>, Self::Error> {
        let response = self
            .client
            .get(self.categories_url())
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let rows = response
            .json::<Vec<CategoryRow>>()
            .await
            .map_err(|e| RegistryError::Decode(format!("category rows: {}", e)))?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let registry = RestFileRegistry::new("http://registry.local/", "key");
        assert_eq!(registry.file_url("f1"), "http://registry.local/files/f1");
        assert_eq!(
            registry.content_url("f1"),
            "http://registry.local/files/f1/content"
        );
    }

    #[test]
    fn test_categories_url_filters_active() {
        let registry = RestCategoryRegistry::new("http://registry.local", "key");
        assert_eq!(
            registry.categories_url(),
            "http://registry.local/categories?status=active"
        );
    }

    #[test]
    fn test_file_row_maps_to_descriptor() {
        let row: FileRow = serde_json::from_value(serde_json::json!({
            "id": "f1",
            "original_name": "receipt.pdf",
            "mime_type": "application/pdf",
            "size_bytes": 2048,
            "checksum_sha256": "ab".repeat(32),
            "uploaded_by": "user-1",
            "storage_key": "uploads/f1.pdf",
            "created_at": "2024-03-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.storage_key, "uploads/f1.pdf");
        assert_eq!(row.created_at, "2024-03-02T10:00:00Z");

        let descriptor = row.into_descriptor();
        assert_eq!(descriptor.id, "f1");
        assert_eq!(descriptor.byte_size, 2048);
        assert_eq!(descriptor.content_hash.len(), 64);
        assert_eq!(descriptor.uploaded_by, "user-1");
    }

    #[tokio::test]
    async fn test_unreachable_registry_reports_transport_error() {
        // Nothing listens on port 1
        let registry = RestCategoryRegistry::new("http://127.0.0.1:1", "key");
        let result = registry.active_names().await;

        match result {
            Err(RegistryError::Unreachable(_)) => {}
            other => panic!("Expected Unreachable error, got {:?}", other.map(|_| ())),
        }
    }
}
