//! Purser Vision Provider Layer
//!
//! Implementations of the `VisionProvider` trait from `purser-domain`.
//!
//! # Architecture
//!
//! The gateway owns everything provider-shaped: wire format, transfer
//! encoding, timeouts, and the retry loop. Callers hand it a
//! `DocumentRequest` and get back the provider's raw response body; decoding
//! that body is the parser's job, so a scripted mock and the real gateway
//! are interchangeable above this boundary.
//!
//! # Providers
//!
//! - `GeminiVision`: Google Gemini `generateContent` with structured output
//! - `MockVision`: scripted responses and call capture for tests
//!
//! # Error classification
//!
//! Only [`VisionError::Transport`] is retryable, and only the gateway itself
//! retries it. A rejected request (HTTP 4xx) would fail identically on every
//! attempt, and a configuration hole cannot be fixed by waiting.

#![warn(missing_docs)]

pub mod gemini;
pub mod mock;
pub mod retry;

use thiserror::Error;

pub use gemini::{GeminiVision, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
pub use mock::MockVision;
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

/// Errors that can occur during vision provider operations
#[derive(Error, Debug)]
pub enum VisionError {
    /// Missing or unusable provider configuration; fatal, surfaced before
    /// any call is attempted
    #[error("Provider not configured: {0}")]
    Configuration(String),

    /// The provider refused the request; a retry would get the same answer
    #[error("Provider rejected request (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body text, best effort
        body: String,
    },

    /// Network failure, timeout, or provider-side fault
    #[error("Transport error: {0}")]
    Transport(String),
}

impl VisionError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(VisionError::Transport("connection reset".to_string()).is_retryable());
        assert!(!VisionError::Configuration("no key".to_string()).is_retryable());
        assert!(!VisionError::Rejected {
            status: 400,
            body: "bad request".to_string()
        }
        .is_retryable());
    }
}
