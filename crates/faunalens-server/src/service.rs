//! Core classification logic

use std::sync::Arc;
use std::time::Instant;

use faunalens_core::prompt::CLASSIFICATION_PROMPT;
use faunalens_core::{response_schema, validate_str, ClassificationResult, Error, ImagePayload, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::ServerConfig;
use crate::provider::{GeminiProvider, InferenceProvider, InferenceRequest};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Multimodal model backend
    pub provider: Arc<dyn InferenceProvider>,

    /// Structured-output schema, built once
    pub schema: Arc<Value>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state with the configured Gemini provider
    pub fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        let provider = GeminiProvider::new(&config.provider, config.request_timeout())?;
        Ok(Self::with_provider(config, Arc::new(provider), metrics_handle))
    }

    /// Initialize application state around an existing provider
    pub fn with_provider(
        config: ServerConfig,
        provider: Arc<dyn InferenceProvider>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            schema: Arc::new(response_schema()),
            metrics_handle,
        }
    }
}

/// Classify one image.
///
/// `image` is a data URI or bare base64 string. Every failure after input
/// parsing is returned as a distinct [`Error`] variant; collapsing them for
/// the client happens at the HTTP boundary.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4(), provider = state.provider.name()))]
pub async fn classify(state: &AppState, image: &str) -> Result<ClassificationResult> {
    let payload = ImagePayload::parse(image)?;
    debug!(
        "Parsed {} image, {} bytes",
        payload.mime_type(),
        payload.size_bytes()
    );

    let request = InferenceRequest {
        prompt: CLASSIFICATION_PROMPT,
        image: &payload,
        schema: &state.schema,
    };

    let timeout = state.config.request_timeout();
    let start = Instant::now();
    let text = tokio::time::timeout(timeout, state.provider.generate(request))
        .await
        .map_err(|_| Error::Timeout(timeout))??;
    let latency = start.elapsed();

    metrics::histogram!("faunalens_inference_latency_ms").record(latency.as_millis() as f64);

    let result = validate_str(&text)?;

    let outcome = if result.is_animal { "animal" } else { "not_animal" };
    metrics::counter!("faunalens_classifications_total", "outcome" => outcome).increment(1);

    if result.is_animal {
        info!(
            "Classified as {} ({}), confidence {}, latency {:?}",
            result.common_name.as_deref().unwrap_or("?"),
            result.scientific_name.as_deref().unwrap_or("?"),
            result.confidence,
            latency
        );
    } else {
        info!("No animal detected, latency {:?}", latency);
    }

    Ok(result)
}
