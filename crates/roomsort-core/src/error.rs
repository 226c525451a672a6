//! Error types for the roomsort categorization pipeline.
//!
//! Errors are organized by stage so that callers can tell a missing file from
//! a transport failure, a malformed model answer, or a provider whose token
//! accounting does not add up.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while categorizing a single image.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image path does not exist. Raised before any bytes are read.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Image exists but could not be read
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Remote model call failed (connectivity, auth, rate limit, non-2xx, timeout)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Model answer is not valid JSON, lacks a field, or names an unknown category
    #[error("Schema violation for {path}: {message}")]
    SchemaViolation { path: PathBuf, message: String },

    /// A 2xx response body that does not parse. Providers raise this without
    /// knowing the image; the categorizer reports it as `SchemaViolation`.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Image directory could not be listed
    #[error("Failed to list {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    /// Provider-reported total does not equal prompt + candidates + thoughts
    #[error(
        "Token usage mismatch for {path}: total {total} != prompt {prompt} + candidates {candidates} + thoughts {thoughts}"
    )]
    UsageMismatch {
        path: PathBuf,
        prompt: u32,
        candidates: u32,
        thoughts: u32,
        total: u32,
    },
}

impl PipelineError {
    /// Whether this error signals a broken assumption about the provider
    /// rather than a problem with one image.
    ///
    /// Fatal errors stop a batch even when the caller asked to keep going.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::UsageMismatch { .. })
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
