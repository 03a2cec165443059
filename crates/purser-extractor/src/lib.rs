//! Purser Extractor
//!
//! Converts uploaded receipts and invoices into normalized expense drafts
//! using a vision-capable LLM.
//!
//! # Overview
//!
//! The pipeline is the write path of the expense system: a caller points it
//! at an uploaded file, it asks the model for structured output, then forces
//! every field into its documented value set before anything reaches the
//! caller. Model output is never trusted: amounts, dates, enums and the
//! category all pass through coercion and reconciliation.
//!
//! # Architecture
//!
//! ```text
//! file_id → FileRegistry → PromptBuilder → VisionProvider
//!        → parser → normalizer → reconciler → NormalizedDraft
//! ```
//!
//! # Key Features
//!
//! - **Per-request category context**: the allowlist is re-fetched on every
//!   call, with a seed vocabulary standing in when the registry has none
//! - **Structured output**: the provider is constrained by a response schema
//!   and the prompt embeds the allowlist verbatim
//! - **Total normalization**: unusable model values fall back to documented
//!   defaults instead of failing the extraction
//! - **Category reconciliation**: suggestions outside the allowlist are
//!   replaced, with the original wording preserved in notes
//!
//! # Example Usage
//!
//! ```no_run
//! use purser_domain::ExtractionRequest;
//! use purser_extractor::{ExtractionPipeline, ExtractorConfig};
//! use purser_registry::{MemoryCategoryRegistry, MemoryFileRegistry};
//! use purser_vision::MockVision;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Setup
//! let files = MemoryFileRegistry::new();
//! let receipt = files.register("f1", "image/jpeg", vec![0xFF, 0xD8], "user-1")?;
//! let categories = MemoryCategoryRegistry::with_names(["Travel", "Meals", "Other"]);
//!
//! let pipeline = ExtractionPipeline::new(
//!     files,
//!     categories,
//!     MockVision::default(),
//!     ExtractorConfig::default(),
//! );
//!
//! // Extract a draft from the uploaded file
//! let outcome = pipeline.extract(ExtractionRequest::new(&receipt.id)).await?;
//!
//! println!("Vendor: {}", outcome.draft.vendor);
//! println!("Total: {} {}", outcome.draft.amount_gross, outcome.draft.currency);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod categories;
mod config;
mod error;
mod normalize;
mod parser;
mod pipeline;
mod prompt;
mod reconcile;
mod types;


pub use categories::build_category_context;
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use normalize::normalize;
pub use parser::parse_provider_payload;
pub use pipeline::ExtractionPipeline;
pub use prompt::{response_schema, PromptBuilder};
pub use reconcile::reconcile;
pub use types::{CategoryContext, ExtractionMetadata, ExtractionOutcome};
