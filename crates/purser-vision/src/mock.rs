//! Scripted vision provider for deterministic tests
//!
//! Returns queued results in order and captures every request it saw, so
//! tests can assert on both outcomes and the instructions that were sent.

use async_trait::async_trait;
use purser_domain::{DocumentRequest, VisionProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::VisionError;

/// Mock vision provider
///
/// Clones share the script and the capture log, so a test can keep a handle
/// while the pipeline owns another.
#[derive(Clone)]
pub struct MockVision {
    default_payload: String,
    script: Arc<Mutex<VecDeque<Result<String, VisionError>>>>,
    requests: Arc<Mutex<Vec<DocumentRequest>>>,
}

impl MockVision {
    /// Create a mock that answers every call with the given payload once
    /// the script queue is empty
    pub fn new(default_payload: impl Into<String>) -> Self {
        Self {
            default_payload: default_payload.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wrap extracted text in the provider's response envelope
    ///
    /// Payloads cross the gateway boundary undecoded, so scripted successes
    /// must look like real provider bodies.
    pub fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }]
                }
            }]
        })
        .to_string()
    }

    /// Queue a successful payload for the next unscripted call
    pub fn push_payload(&self, payload: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(payload.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&self, error: VisionError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Number of calls observed
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests captured so far, in call order
    pub fn captured_requests(&self) -> Vec<DocumentRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent captured request, if any call happened
    pub fn last_request(&self) -> Option<DocumentRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockVision {
    fn default() -> Self {
        Self::new(Self::envelope("{}"))
    }
}

#[async_trait]
impl VisionProvider for MockVision {
    type Error = VisionError;

    async fn extract(&self, request: &DocumentRequest) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }
        Ok(self.default_payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> DocumentRequest {
        DocumentRequest {
            instructions: "prompt".to_string(),
            response_schema: json!({}),
            mime_type: "image/png".to_string(),
            content: vec![0xFF],
        }
    }

    #[tokio::test]
    async fn test_script_runs_in_order_then_default() {
        let mock = MockVision::new("default");
        mock.push_payload("first");
        mock.push_error(VisionError::Transport("scripted".to_string()));

        assert_eq!(mock.extract(&request()).await.unwrap(), "first");
        assert!(mock.extract(&request()).await.is_err());
        assert_eq!(mock.extract(&request()).await.unwrap(), "default");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_requests_are_captured() {
        let mock = MockVision::new("default");
        mock.extract(&request()).await.unwrap();

        let captured = mock.last_request().unwrap();
        assert_eq!(captured.instructions, "prompt");
        assert_eq!(captured.content, vec![0xFF]);
    }

    #[test]
    fn test_envelope_wraps_text() {
        let body: serde_json::Value =
            serde_json::from_str(&MockVision::envelope("{\"vendor\":\"x\"}")).unwrap();
        assert_eq!(
            body["candidates"][0]["content"]["parts"][0]["text"],
            "{\"vendor\":\"x\"}"
        );
    }
}
