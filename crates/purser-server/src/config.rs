//! Configuration for the extraction server.
//!
//! Settings come from an optional TOML file plus environment overrides; the
//! provider API key is environment-only and never lives in a config file.

use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Provider API key absent or empty
    #[error("GEMINI_API_KEY must be set and non-empty")]
    MissingApiKey,

    /// An environment override did not parse
    #[error("Invalid value for {0}: {1}")]
    InvalidOverride(String, String),
}

/// Server configuration loaded from TOML and the environment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port the HTTP server binds (e.g. "0.0.0.0:8080")
    pub bind_addr: String,

    /// Base URL of the file/category registry service
    pub registry_url: String,

    /// Service credential sent as a bearer token to the registry
    pub registry_key: String,

    /// Vision model name
    pub gemini_model: String,

    /// Provider API endpoint; overridable so tests can point the gateway at
    /// a local server
    pub gemini_endpoint: String,

    /// Total provider attempts per call, first try included
    pub retry_max_attempts: u32,

    /// Base backoff delay between provider attempts (milliseconds)
    pub retry_base_delay_ms: u64,

    /// Timeout for a single provider HTTP request (seconds)
    pub request_timeout_secs: u64,

    /// Overall budget for one extraction's provider call (seconds)
    pub provider_call_timeout_secs: u64,

    /// Re-hash fetched content against the registry's recorded checksum
    pub verify_content_hash: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            registry_url: "http://127.0.0.1:8081".to_string(),
            registry_key: String::new(),
            gemini_model: purser_vision::DEFAULT_MODEL.to_string(),
            gemini_endpoint: purser_vision::DEFAULT_ENDPOINT.to_string(),
            retry_max_attempts: purser_vision::DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: 1000,
            request_timeout_secs: purser_vision::DEFAULT_TIMEOUT_SECS,
            provider_call_timeout_secs: 120,
            verify_content_hash: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration: explicit file, else `PURSER_CONFIG`, else
    /// defaults, with environment overrides applied on top
    pub fn load(explicit_path: Option<&str>) -> Result<Self, ConfigError> {
        let path = explicit_path
            .map(str::to_string)
            .or_else(|| env::var("PURSER_CONFIG").ok());

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `PURSER_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(addr) = env::var("PURSER_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(url) = env::var("PURSER_REGISTRY_URL") {
            self.registry_url = url;
        }
        if let Ok(key) = env::var("PURSER_REGISTRY_KEY") {
            self.registry_key = key;
        }
        if let Ok(model) = env::var("PURSER_GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Ok(endpoint) = env::var("PURSER_GEMINI_ENDPOINT") {
            self.gemini_endpoint = endpoint;
        }
        self.retry_max_attempts = parsed_override("PURSER_RETRY_MAX_ATTEMPTS")?
            .unwrap_or(self.retry_max_attempts);
        self.retry_base_delay_ms = parsed_override("PURSER_RETRY_BASE_DELAY_MS")?
            .unwrap_or(self.retry_base_delay_ms);
        self.request_timeout_secs = parsed_override("PURSER_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(self.request_timeout_secs);
        self.provider_call_timeout_secs = parsed_override("PURSER_PROVIDER_TIMEOUT_SECS")?
            .unwrap_or(self.provider_call_timeout_secs);
        Ok(())
    }

    /// Base backoff delay as a Duration
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Per-request provider timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Read the provider API key from the environment
///
/// The key is a secret and deliberately has no config-file form. A missing
/// or empty key is fatal at startup.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    match env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}

fn parsed_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidOverride(name.to_string(), e.to_string())),
        Err(_) => Ok(None),
    }
}
