//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates: REST registries in
//! `purser-registry`, the vision gateway in `purser-vision`.

use async_trait::async_trait;

use crate::{DocumentRequest, FileDescriptor};

/// Lookup and content access for uploaded documents
///
/// Implemented by the infrastructure layer (purser-registry)
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Error type for registry operations
    type Error;

    /// Fetch the descriptor for a file id; `None` when unknown
    async fn descriptor(&self, file_id: &str) -> Result<Option<FileDescriptor>, Self::Error>;

    /// Fetch the stored bytes for a known descriptor
    async fn content(&self, descriptor: &FileDescriptor) -> Result<Vec<u8>, Self::Error>;
}

/// Access to the organization's active expense categories
///
/// Implemented by the infrastructure layer (purser-registry). Callers fetch
/// on every extraction; implementations must not cache across calls on the
/// pipeline's behalf.
#[async_trait]
pub trait CategoryRegistry: Send + Sync {
    /// Error type for registry operations
    type Error;

    /// Names of the currently active categories, in registry order
    async fn active_names(&self) -> Result<Vec<String>, Self::Error>;
}

/// A vision-capable model endpoint able to honor a response schema
///
/// Implemented by the infrastructure layer (purser-vision). On success the
/// provider's response body comes back unmodified; decoding the envelope is
/// the parser's job.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Error type for provider operations
    type Error;

    /// Run one extraction call, retrying transient transport failures
    /// internally per the provider's policy
    async fn extract(&self, request: &DocumentRequest) -> Result<String, Self::Error>;
}
