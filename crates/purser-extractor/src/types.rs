//! Pipeline output types

use purser_domain::{CategoryAllowlist, NormalizedDraft};

/// The per-request category context
///
/// Built fresh for every extraction; nothing here outlives a single call.
#[derive(Debug, Clone)]
pub struct CategoryContext {
    /// The vocabulary used for both prompting and reconciliation
    pub allowlist: CategoryAllowlist,

    /// True when the registry had no active categories and the seed
    /// vocabulary stepped in
    pub from_seed: bool,
}

/// Result of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The normalized, reconciled expense draft
    pub draft: NormalizedDraft,

    /// Metadata about how the draft came to be
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction run
///
/// Logged for provenance; never part of the caller-facing draft.
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Registry id of the extracted file
    pub file_id: String,

    /// Content hash recorded by the registry
    pub content_hash: String,

    /// Name of the vision model used
    pub model_name: String,

    /// Timestamp when the extraction completed (seconds since Unix epoch)
    pub timestamp: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Whether the seed vocabulary replaced an empty registry answer
    pub used_seed_vocabulary: bool,

    /// Whether reconciliation replaced the model's category suggestion
    pub category_replaced: bool,

    /// Whether fetched content no longer hashed to the registry's record
    pub content_hash_mismatch: bool,
}
