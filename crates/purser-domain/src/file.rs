//! File descriptors and upload constraints
//!
//! The extraction core never stores documents itself; it consumes metadata
//! recorded by the file registry at upload time. Upload constraints live here
//! so registry implementations and upstream validators agree on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted document size: 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Mime types the pipeline knows how to hand to the vision provider
pub const ACCEPTED_MIME_TYPES: [&str; 4] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "application/pdf",
];

/// Metadata the file registry holds for one uploaded document
///
/// The content hash is computed at upload time over the exact stored bytes
/// (see [`crate::checksum::content_hash`]) and doubles as a dedupe key for
/// upstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Registry-assigned identifier
    pub id: String,

    /// Declared mime type, one of [`ACCEPTED_MIME_TYPES`]
    pub mime_type: String,

    /// Size of the stored content in bytes
    pub byte_size: u64,

    /// Lowercase hex SHA-256 of the stored content
    pub content_hash: String,

    /// Identity of the uploader
    pub uploaded_by: String,
}

/// Rejection reasons for an upload that never reaches the registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The declared mime type is not one the pipeline accepts
    #[error("unsupported document type: {0}")]
    UnsupportedType(String),

    /// The document exceeds the size limit
    #[error("document too large: {size} bytes (limit {limit})")]
    TooLarge {
        /// Size of the rejected document
        size: u64,
        /// The enforced limit
        limit: u64,
    },
}

/// Check an upload's declared mime type and size against the constraints
pub fn validate_upload(mime_type: &str, byte_size: u64) -> Result<(), UploadError> {
    if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
        return Err(UploadError::UnsupportedType(mime_type.to_string()));
    }
    if byte_size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: byte_size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
