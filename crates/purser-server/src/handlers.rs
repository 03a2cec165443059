//! HTTP request handlers for the extraction server.
//!
//! Implements the extraction and health endpoints using axum. Error bodies
//! follow a fixed contract so browser clients can branch on them: every
//! failure is `{"error": ...}` with an optional `details` string, and
//! successful extractions are `{"success": true, "data": ...}`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use purser_domain::{
    CategoryRegistry, ExtractionRequest, FileRegistry, NormalizedDraft, VisionProvider,
};
use purser_extractor::{ExtractError, ExtractionPipeline};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

/// Shared application state
pub struct AppState<F, C, V>
where
    F: FileRegistry,
    C: CategoryRegistry,
    V: VisionProvider,
{
    /// The extraction pipeline, shared across handlers
    pub pipeline: Arc<ExtractionPipeline<F, C, V>>,
    /// Model name reported by the health endpoint
    pub model: String,
}

impl<F, C, V> Clone for AppState<F, C, V>
where
    F: FileRegistry,
    C: CategoryRegistry,
    V: VisionProvider,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            model: self.model.clone(),
        }
    }
}

/// Extraction request body
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Identifier of a previously uploaded file
    #[serde(default)]
    pub file_id: Option<String>,
}

/// Successful extraction response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Always `true` on this path
    pub success: bool,
    /// The normalized draft
    pub data: NormalizedDraft,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Configured vision model
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable, client-facing error message
    pub error: String,
    /// Underlying cause, when safe to expose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(ExtractError);

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self.0 {
            ExtractError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ExtractError::FileMissing(_) => {
                (StatusCode::NOT_FOUND, "File not found".to_string(), None)
            }
            ExtractError::NoContent => (
                StatusCode::BAD_REQUEST,
                "No data extracted from document".to_string(),
                None,
            ),
            ExtractError::MalformedOutput(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid response format from AI".to_string(),
                None,
            ),
            ExtractError::Provider(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI processing failed".to_string(),
                Some(msg.clone()),
            ),
            ExtractError::Timeout => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI processing failed".to_string(),
                Some(self.0.to_string()),
            ),
            ExtractError::Registry(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg.clone()),
            ),
        };

        if status.is_server_error() {
            error!("Extraction failed: {}", self.0);
        } else {
            warn!("Extraction rejected: {}", self.0);
        }

        let body = Json(ErrorResponse { error, details });
        (status, body).into_response()
    }
}

/// POST /api/extract - Extract a draft expense from an uploaded file
///
/// A missing, empty or unparseable body is treated the same as a blank
/// `file_id`: the caller gets the validation error, not a framework
/// rejection.
async fn extract_expense<F, C, V>(
    State(state): State<AppState<F, C, V>>,
    body: Option<Json<ExtractRequest>>,
) -> Result<Json<ExtractResponse>, AppError>
where
    F: FileRegistry + 'static,
    C: CategoryRegistry + 'static,
    V: VisionProvider + 'static,
    F::Error: std::fmt::Display,
    C::Error: std::fmt::Display,
    V::Error: std::fmt::Display,
{
    let file_id = body
        .and_then(|Json(request)| request.file_id)
        .unwrap_or_default();

    let outcome = state
        .pipeline
        .extract(ExtractionRequest::new(file_id))
        .await?;

    Ok(Json(ExtractResponse {
        success: true,
        data: outcome.draft,
    }))
}

/// GET /health - Liveness probe
async fn health_check<F, C, V>(
    State(state): State<AppState<F, C, V>>,
) -> Json<HealthCheckResponse>
where
    F: FileRegistry + 'static,
    C: CategoryRegistry + 'static,
    V: VisionProvider + 'static,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model: state.model.clone(),
    })
}

/// Create the axum router with all routes
///
/// CORS is wide open: the extraction API is consumed straight from browser
/// clients on other origins.
pub fn create_router<F, C, V>(state: AppState<F, C, V>) -> AxumRouter
where
    F: FileRegistry + 'static,
    C: CategoryRegistry + 'static,
    V: VisionProvider + 'static,
    F::Error: std::fmt::Display,
    C::Error: std::fmt::Display,
    V::Error: std::fmt::Display,
{
    AxumRouter::new()
        .route("/api/extract", post(extract_expense))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
