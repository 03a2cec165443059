//! Configuration for the extraction pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Overall budget for one provider call, its internal retries included
    /// (seconds)
    pub provider_call_timeout_secs: u64,

    /// Re-hash fetched content and compare against the registry's recorded
    /// hash; a mismatch is logged, never fatal
    pub verify_content_hash: bool,
}

impl ExtractorConfig {
    /// Get the provider call budget as a Duration
    pub fn provider_call_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provider_call_timeout_secs == 0 {
            return Err("provider_call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider_call_timeout_secs: 120,
            verify_content_hash: true,
        }
    }
}
