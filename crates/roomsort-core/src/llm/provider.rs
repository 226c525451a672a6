//! LLM provider trait and request/response types.
//!
//! Defines the interface the categorizer talks to, plus the factory that
//! builds the configured backend.

use crate::config::ModelConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::time::Duration;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }
}

/// A structured-output request: one instruction, one image, one schema.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The image to classify
    pub image: ImageInput,
    /// Instruction text for the model
    pub prompt: String,
    /// Sampling temperature, always [`LlmRequest::TEMPERATURE`]
    pub temperature: f32,
    /// JSON schema the response text must follow
    pub response_schema: serde_json::Value,
}

impl LlmRequest {
    /// Deterministic sampling for every classification.
    pub const TEMPERATURE: f32 = 0.0;

    /// Build a classification request asking for JSON that matches `schema`.
    pub fn structured(image: ImageInput, prompt: &str, schema: serde_json::Value) -> Self {
        Self {
            image,
            prompt: prompt.to_string(),
            temperature: Self::TEMPERATURE,
            response_schema: schema,
        }
    }
}

/// Token counts reported by the provider for one call.
///
/// Providers omit zero-valued counts, so absent fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    /// Prompt tokens (instruction text plus image encoding)
    pub prompt: u32,
    /// Tokens in the visible answer
    pub candidates: u32,
    /// Hidden reasoning tokens, billed as output
    pub thoughts: u32,
    /// Provider's own total
    pub total: u32,
}

impl TokenUsage {
    /// Tokens billed as input.
    pub fn input_tokens(&self) -> u32 {
        self.prompt
    }

    /// Tokens billed as output: visible answer plus hidden reasoning.
    pub fn output_tokens(&self) -> u32 {
        self.candidates.saturating_add(self.thoughts)
    }

    /// Whether the reported total equals prompt + candidates + thoughts.
    pub fn reconciles(&self) -> bool {
        u64::from(self.total)
            == u64::from(self.prompt) + u64::from(self.candidates) + u64::from(self.thoughts)
    }
}

/// The response from a structured-output call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text (expected to be a JSON document)
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Token accounting, `None` if the provider reported nothing
    pub usage: Option<TokenUsage>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one request and wait for the answer.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the provider from the model config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the Gemini provider.
    ///
    /// The API key is resolved here, once. `model_override` replaces the
    /// configured model name.
    pub fn create(
        config: &ModelConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, PipelineError> {
        let api_key = resolve_env_var(&config.api_key).ok_or_else(|| PipelineError::Llm {
            message: format!(
                "Gemini API key not set. Set {} or model.api_key in the config file.",
                env_var_name(&config.api_key).unwrap_or("GOOGLE_API_KEY")
            ),
            status_code: None,
        })?;
        let model = model_override.unwrap_or(&config.model);
        Ok(Box::new(super::gemini::GeminiProvider::new(
            &config.endpoint,
            &api_key,
            model,
            config.timeout_ms.map(Duration::from_millis),
        )))
    }
}

fn env_var_name(value: &str) -> Option<&str> {
    value.strip_prefix("${").and_then(|v| v.strip_suffix('}'))
}
