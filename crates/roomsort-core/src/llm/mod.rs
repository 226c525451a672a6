//! LLM integration for image categorization.
//!
//! Provides the provider abstraction, the Gemini backend, and the categorizer
//! that turns one image into a validated [`Categorization`](crate::types::Categorization).

pub(crate) mod categorizer;
pub(crate) mod gemini;
pub(crate) mod provider;

pub use categorizer::{BatchEvent, BatchOptions, CategorizeOptions, Categorizer};
pub use provider::{
    resolve_env_var, ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse,
    TokenUsage,
};
