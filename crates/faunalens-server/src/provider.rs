//! Multimodal inference providers
//!
//! A provider takes the instruction text, one image and the target schema, and
//! returns the model's structured output as raw text. Parsing and checking
//! that output against the classification schema is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use faunalens_core::{Error, ImagePayload, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ProviderConfig;

/// Longest provider error body kept for logs
const MAX_ERROR_BODY: usize = 512;

/// Inputs for one structured-output call
#[derive(Debug, Clone, Copy)]
pub struct InferenceRequest<'a> {
    pub prompt: &'a str,
    pub image: &'a ImagePayload,
    pub schema: &'a Value,
}

/// A multimodal model that produces schema-constrained JSON
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Run one inference call and return the raw structured output text
    async fn generate(&self, request: InferenceRequest<'_>) -> Result<String>;
}

/// Google Gemini `generateContent` client
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl GeminiProvider {
    /// Create a new Gemini client
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("Gemini provider requires an API key"))?;

        // The outer request timeout is authoritative; this one only bounds a
        // connection that never answers.
        let client = Client::builder()
            .timeout(timeout + Duration::from_secs(5))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        info!("Gemini provider configured: model={}", config.model);

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key,
        })
    }

    fn build_request(request: &InferenceRequest<'_>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text {
                        text: request.prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type().to_string(),
                            data: request.image.base64_data().to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.clone(),
            },
        }
    }
}

#[async_trait]
impl InferenceProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: InferenceRequest<'_>) -> Result<String> {
        debug!(
            "Sending {} byte {} image to {}",
            request.image.size_bytes(),
            request.image.mime_type(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&Self::build_request(&request))
            .send()
            .await
            .map_err(|e| Error::inference(format!("request to provider failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            error!("Provider request failed: {} {}", status, snippet);
            return Err(Error::inference(format!("provider returned {}", status)));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::inference(format!("unreadable provider response: {}", e)))?;

        extract_text(body)
    }
}

/// Join the answer text of the first candidate
fn extract_text(body: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        warn!("Provider blocked the prompt: {}", reason);
        return Err(Error::inference(format!("prompt blocked: {}", reason)));
    }

    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::inference("provider returned no candidates"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(Error::inference(format!(
            "candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

// =============================================================================
// Gemini wire structures
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_wire_format() {
        let image = ImagePayload::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").unwrap();
        let schema = json!({ "type": "OBJECT" });
        let request = InferenceRequest {
            prompt: "Analisis gambar ini",
            image: &image,
            schema: &schema,
        };

        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analisis gambar ini");
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["data"],
            image.base64_data()
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_extract_text_joins_parts_and_skips_thoughts() {
        let body = response(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": "1}" }
                ]},
                "finishReason": "STOP"
            }]
        }));

        assert_eq!(extract_text(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body = response(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert!(matches!(extract_text(body), Err(Error::Inference(msg)) if msg.contains("SAFETY")));
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let body = response(json!({ "candidates": [] }));
        assert!(matches!(extract_text(body), Err(Error::Inference(_))));
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let body = response(json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] }));
        assert!(matches!(
            extract_text(body),
            Err(Error::Inference(msg)) if msg.contains("MAX_TOKENS")
        ));
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = ProviderConfig::default();
        assert!(matches!(
            GeminiProvider::new(&config, Duration::from_secs(1)),
            Err(Error::Config(_))
        ));
    }
}
