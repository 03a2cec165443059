//! Purser Domain Layer
//!
//! This crate contains the core domain model for Purser's expense extraction
//! pipeline. It defines the value objects that cross crate boundaries and the
//! trait interfaces behind which infrastructure lives.
//!
//! ## Key Concepts
//!
//! - **FileDescriptor**: Registry metadata for an uploaded document
//! - **CategoryAllowlist**: The per-request set of category names the model
//!   may suggest and the reconciler will accept
//! - **RawExtraction**: The model's output before any validation, loosely
//!   typed, internal only, never serialized to callers
//! - **NormalizedDraft**: The validated, fully-typed expense draft that
//!   leaves the core
//!
//! ## Architecture
//!
//! Infrastructure implementations (registries, the vision provider) live in
//! other crates and plug in through the traits defined here. Nothing in this
//! crate performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod checksum;
pub mod draft;
pub mod file;
pub mod request;
pub mod traits;

// Re-exports for convenience
pub use category::{CategoryAllowlist, FALLBACK_CATEGORY};
pub use checksum::content_hash;
pub use draft::{Currency, NormalizedDraft, PaymentMethod, RawExtraction, TaxLabel};
pub use file::{FileDescriptor, UploadError};
pub use request::{DocumentRequest, ExtractionRequest};
pub use traits::{CategoryRegistry, FileRegistry, VisionProvider};
