//! Gemini Provider Implementation
//!
//! Talks to Google's Generative Language API in structured-output mode: the
//! response schema rides along in `generationConfig`, so the model answers
//! with bare JSON instead of prose.
//!
//! # Features
//!
//! - Document bytes attached inline (base64) next to the instructions
//! - Request timeout on every attempt
//! - Bounded retry loop with exponential backoff for transport failures
//! - HTTP 4xx treated as final; retrying a rejected request is pointless

use base64::{engine::general_purpose::STANDARD, Engine};
use purser_domain::{DocumentRequest, VisionProvider};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{RetryPolicy, VisionError};

/// Default Generative Language API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model for document extraction
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default timeout for provider requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini `generateContent` gateway
pub struct GeminiVision {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl GeminiVision {
    /// Create a gateway with the default endpoint, model, timeout and retry
    /// policy
    ///
    /// Fails fast on an empty API key: a gateway that cannot possibly
    /// authenticate should never reach its first request.
    pub fn new(api_key: impl Into<String>) -> Result<Self, VisionError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a gateway with an explicit per-request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VisionError::Configuration(
                "API key is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
            client,
            retry: RetryPolicy::default(),
        })
    }

    /// Override the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint; local servers make the gateway testable
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    fn request_body(&self, request: &DocumentRequest) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": request.instructions },
                    {
                        "inline_data": {
                            "mime_type": request.mime_type,
                            "data": STANDARD.encode(&request.content),
                        }
                    }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.response_schema,
            }
        })
    }

    async fn call_once(&self, url: &str, body: &Value) -> Result<String, VisionError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Transport(format!("Request timed out: {}", e))
                } else {
                    VisionError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| VisionError::Transport(format!("Reading response: {}", e)));
        }

        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status.is_client_error() {
            Err(VisionError::Rejected {
                status: status.as_u16(),
                body: body_text,
            })
        } else {
            Err(VisionError::Transport(format!(
                "HTTP {}: {}",
                status, body_text
            )))
        }
    }
}

#[async_trait::async_trait]
impl VisionProvider for GeminiVision {
    type Error = VisionError;

    async fn extract(&self, request: &DocumentRequest) -> Result<String, Self::Error> {
        let url = self.request_url();
        let body = self.request_body(request);
        debug!(
            "Calling {} with {} document bytes",
            self.model,
            request.content.len()
        );

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.call_once(&url, &body).await {
                Ok(text) => {
                    debug!("Provider responded after {} attempt(s)", attempt);
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts() => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        "Provider attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.retry.max_attempts(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> DocumentRequest {
        DocumentRequest {
            instructions: "extract the receipt".to_string(),
            response_schema: json!({ "type": "OBJECT" }),
            mime_type: "image/png".to_string(),
            content: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = GeminiVision::new("  ");
        assert!(matches!(result, Err(VisionError::Configuration(_))));
    }

    #[test]
    fn test_request_url_shape() {
        let gateway = GeminiVision::new("secret")
            .unwrap()
            .with_endpoint("http://localhost:9999/")
            .with_model("gemini-test");
        assert_eq!(
            gateway.request_url(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent?key=secret"
        );
    }

    #[test]
    fn test_request_body_carries_document_inline() {
        let gateway = GeminiVision::new("secret").unwrap();
        let body = gateway.request_body(&sample_request());

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "extract the receipt");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");

        let data = parts[1]["inline_data"]["data"].as_str().unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_request_body_asks_for_structured_json() {
        let gateway = GeminiVision::new("secret").unwrap();
        let body = gateway.request_body(&sample_request());

        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }
}
