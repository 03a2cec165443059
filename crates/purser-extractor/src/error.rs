//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Variants map one-to-one onto the caller-visible failure classes; the
/// HTTP layer translates them without inspecting messages.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The request itself is unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested file is not in the registry
    #[error("File not found: {0}")]
    FileMissing(String),

    /// A registry could not be reached or answered nonsense
    #[error("Registry error: {0}")]
    Registry(String),

    /// The vision provider failed: rejected the request or exhausted its
    /// retry budget
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider call exceeded the pipeline's overall budget
    #[error("Provider call timed out")]
    Timeout,

    /// The provider answered but carried no extractable content
    #[error("No extractable content in provider response")]
    NoContent,

    /// The provider's content was not the JSON it promised
    #[error("Invalid provider output: {0}")]
    MalformedOutput(String),
}
