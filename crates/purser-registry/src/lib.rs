//! Purser Registry Layer
//!
//! Implementations of the file and category registry traits from
//! `purser-domain`.
//!
//! # Architecture
//!
//! Two families of implementations share each trait:
//!
//! - `RestFileRegistry` / `RestCategoryRegistry`: HTTP clients for the
//!   registry service that owns uploads and the category vocabulary
//! - `MemoryFileRegistry` / `MemoryCategoryRegistry`: in-process registries
//!   for tests and local development
//!
//! # Examples
//!
//! ```
//! use purser_registry::MemoryFileRegistry;
//!
//! let registry = MemoryFileRegistry::new();
//! let descriptor = registry
//!     .register("f1", "application/pdf", b"%PDF-1.4".to_vec(), "user-1")
//!     .unwrap();
//! assert_eq!(descriptor.byte_size, 8);
//! assert_eq!(descriptor.content_hash.len(), 64);
//! ```

#![warn(missing_docs)]

pub mod memory;
pub mod rest;

use purser_domain::UploadError;
use thiserror::Error;

pub use memory::{MemoryCategoryRegistry, MemoryFileRegistry};
pub use rest::{RestCategoryRegistry, RestFileRegistry};

/// Errors that can occur during registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network failure reaching the registry service
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    /// The registry answered with an unexpected status
    #[error("registry returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text, best effort
        body: String,
    },

    /// The registry's response body did not decode
    #[error("registry response malformed: {0}")]
    Decode(String),

    /// An upload was rejected before reaching storage
    #[error(transparent)]
    Upload(#[from] UploadError),
}
