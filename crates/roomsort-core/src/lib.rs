//! roomsort core - categorize property photos with a multimodal LLM.
//!
//! Each image is sent to the model together with a fixed instruction and a
//! response schema listing the allowed categories. The answer is validated
//! against the closed taxonomy and the provider's token accounting before it
//! is returned.
//!
//! ```text
//! Directory → Discover → Encode → Gemini (structured output) → Validate → Categorization
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomsort_core::{ApartmentCategory, CategorizeOptions, Categorizer, Config, LlmProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let provider = LlmProviderFactory::create(&config.model, None)?;
//!     let categorizer = Categorizer::new(provider, CategorizeOptions::default());
//!
//!     let result = categorizer
//!         .categorize::<ApartmentCategory>("./room1.png".as_ref())
//!         .await?;
//!     println!("{}: {}", result.category, result.reason);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod taxonomy;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use llm::{
    BatchEvent, BatchOptions, CategorizeOptions, Categorizer, LlmProvider, LlmProviderFactory,
    TokenUsage,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{DiscoveredFile, FileDiscovery, ImageEncoder, MimePolicy};
pub use taxonomy::{ApartmentCategory, HotelCategory, PropertyType, Taxonomy};
pub use types::{BatchFailure, BatchReport, BatchSummary, Categorization};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
