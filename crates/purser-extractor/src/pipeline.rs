//! Core extraction pipeline
//!
//! One call runs the whole flow: resolve the file, rebuild the category
//! context, build the prompt, invoke the provider, then parse, normalize and
//! reconcile what came back. The pipeline holds no per-request state, so a
//! single instance serves concurrent requests.

use crate::categories::build_category_context;
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::normalize::normalize;
use crate::parser::parse_provider_payload;
use crate::prompt::PromptBuilder;
use crate::reconcile::reconcile;
use crate::types::{ExtractionMetadata, ExtractionOutcome};
use purser_domain::{
    content_hash, CategoryRegistry, DocumentRequest, ExtractionRequest, FileRegistry,
    VisionProvider,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The pipeline converts an uploaded document into a normalized expense draft
pub struct ExtractionPipeline<F, C, V>
where
    F: FileRegistry,
    C: CategoryRegistry,
    V: VisionProvider,
{
    files: Arc<F>,
    categories: Arc<C>,
    vision: Arc<V>,
    config: ExtractorConfig,
    model_name: String,
}

impl<F, C, V> ExtractionPipeline<F, C, V>
where
    F: FileRegistry + 'static,
    C: CategoryRegistry + 'static,
    V: VisionProvider + 'static,
    F::Error: std::fmt::Display,
    C::Error: std::fmt::Display,
    V::Error: std::fmt::Display,
{
    /// Create a new pipeline
    pub fn new(files: F, categories: C, vision: V, config: ExtractorConfig) -> Self {
        Self {
            files: Arc::new(files),
            categories: Arc::new(categories),
            vision: Arc::new(vision),
            config,
            model_name: "vision".to_string(),
        }
    }

    /// Create a new pipeline with a specific model name in its metadata
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Extract a draft from the referenced file
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionOutcome, ExtractError> {
        let file_id = request.file_id.trim();
        if file_id.is_empty() {
            return Err(ExtractError::Validation("file_id is required".to_string()));
        }

        info!("Starting extraction for file '{}'", file_id);
        let start_time = SystemTime::now();

        // Resolve the file
        let descriptor = self
            .files
            .descriptor(file_id)
            .await
            .map_err(|e| ExtractError::Registry(e.to_string()))?
            .ok_or_else(|| ExtractError::FileMissing(file_id.to_string()))?;

        debug!(
            "Resolved file '{}': {} ({} bytes)",
            descriptor.id, descriptor.mime_type, descriptor.byte_size
        );

        let content = self
            .files
            .content(&descriptor)
            .await
            .map_err(|e| ExtractError::Registry(e.to_string()))?;

        // The stored hash was computed at upload time; recompute over the
        // bytes we actually fetched and flag any drift
        let mut content_hash_mismatch = false;
        if self.config.verify_content_hash {
            let computed = content_hash(&content);
            if computed != descriptor.content_hash {
                warn!(
                    "Content hash drift for file '{}': stored {}, fetched bytes hash to {}",
                    descriptor.id, descriptor.content_hash, computed
                );
                content_hash_mismatch = true;
            }
        }

        // Category context is rebuilt on every call, never cached across
        // requests
        let context = build_category_context(self.categories.as_ref()).await?;
        debug!(
            "Category context ready: {} names{}",
            context.allowlist.len(),
            if context.from_seed { " (seed vocabulary)" } else { "" }
        );

        let builder = PromptBuilder::new(&context.allowlist);
        let document = builder.build_request(&descriptor, content);
        debug!("Prompt length: {} chars", document.instructions.len());

        // Call the provider with a timeout
        let payload = timeout(
            self.config.provider_call_timeout(),
            self.call_provider(&document),
        )
        .await
        .map_err(|_| ExtractError::Timeout)??;

        debug!("Provider payload length: {} chars", payload.len());

        let raw = parse_provider_payload(&payload)?;
        let mut draft = normalize(&raw);
        let category_replaced = reconcile(&mut draft, &context.allowlist);

        let processing_time_ms = start_time
            .elapsed()
            .unwrap_or(Duration::from_secs(0))
            .as_millis() as u64;

        let metadata = ExtractionMetadata {
            file_id: descriptor.id.clone(),
            content_hash: descriptor.content_hash.clone(),
            model_name: self.model_name.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
            processing_time_ms,
            used_seed_vocabulary: context.from_seed,
            category_replaced,
            content_hash_mismatch,
        };

        info!(
            "Extraction complete for file '{}': '{}' {} {} as '{}' in {} ms",
            metadata.file_id,
            draft.vendor,
            draft.amount_gross,
            draft.currency,
            draft.category_suggestion,
            processing_time_ms
        );

        Ok(ExtractionOutcome { draft, metadata })
    }

    /// Call the vision provider
    async fn call_provider(&self, document: &DocumentRequest) -> Result<String, ExtractError> {
        self.vision
            .extract(document)
            .await
            .map_err(|e| ExtractError::Provider(e.to_string()))
    }
}
