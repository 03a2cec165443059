//! Purser Server
//!
//! HTTP surface for the expense extraction core. Wires the REST registries
//! and the Gemini gateway into an extraction pipeline and serves it over
//! axum with permissive CORS.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use purser_extractor::{ExtractionPipeline, ExtractorConfig};
use purser_registry::{RestCategoryRegistry, RestFileRegistry};
use purser_vision::{GeminiVision, RetryPolicy, VisionError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Provider gateway could not be constructed
    #[error("Provider setup error: {0}")]
    Provider(#[from] VisionError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the extraction HTTP server
///
/// Builds the registry clients and the provider gateway from the given
/// configuration and serves until the process is stopped. The API key comes
/// in separately because it is environment-only and never part of
/// [`ServerConfig`].
pub async fn start_server(config: ServerConfig, api_key: String) -> Result<(), ServerError> {
    info!("Starting purser server");
    info!("Bind address: {}", config.bind_addr);
    info!("Registry: {}", config.registry_url);
    info!("Model: {}", config.gemini_model);
    info!(
        "Retry policy: {} attempts, {} ms base delay",
        config.retry_max_attempts, config.retry_base_delay_ms
    );

    let files = RestFileRegistry::new(&config.registry_url, &config.registry_key);
    let categories = RestCategoryRegistry::new(&config.registry_url, &config.registry_key);

    let vision = GeminiVision::with_timeout(api_key, config.request_timeout())?
        .with_model(&config.gemini_model)
        .with_endpoint(&config.gemini_endpoint)
        .with_retry_policy(RetryPolicy::new(
            config.retry_max_attempts,
            config.retry_base_delay(),
        ));

    let extractor_config = ExtractorConfig {
        provider_call_timeout_secs: config.provider_call_timeout_secs,
        verify_content_hash: config.verify_content_hash,
    };

    let pipeline = ExtractionPipeline::new(files, categories, vision, extractor_config)
        .with_model_name(&config.gemini_model);

    let state = AppState {
        pipeline: Arc::new(pipeline),
        model: config.gemini_model.clone(),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
