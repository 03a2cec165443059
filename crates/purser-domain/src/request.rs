//! Request value objects crossing the core's boundaries

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The caller's input: which registered file to extract from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Registry identifier of the uploaded document
    pub file_id: String,
}

impl ExtractionRequest {
    /// Convenience constructor
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }
}

/// A provider-agnostic extraction call: instructions, expected output
/// schema, and the document itself
///
/// Built by the prompt builder, consumed by the vision provider. The
/// document rides along as raw bytes; any transfer encoding (base64 for
/// inline upload) is the provider's concern.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    /// Full instruction text, allowlist already embedded
    pub instructions: String,

    /// JSON schema constraining the provider's structured output
    pub response_schema: Value,

    /// Mime type of the attached document
    pub mime_type: String,

    /// The exact stored bytes of the document
    pub content: Vec<u8>,
}
