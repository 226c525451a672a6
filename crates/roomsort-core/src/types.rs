//! Core data types produced by categorization.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The validated result of categorizing one image.
///
/// `T` is the taxonomy the image was classified into, so a hotel result can
/// never carry an apartment category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Categorization<T> {
    /// Image the result was produced for
    pub path: PathBuf,

    /// One of the taxonomy's labels
    pub category: T,

    /// Single-sentence justification from the model
    pub reason: String,

    /// Prompt tokens (instruction plus image encoding)
    pub input_tokens: u32,

    /// Generated plus hidden reasoning tokens
    pub output_tokens: u32,

    /// Model version that answered
    pub model: String,

    /// Round-trip latency of the model call in milliseconds
    pub latency_ms: u64,
}

/// An image skipped during a batch that was allowed to keep going.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Image that failed
    pub path: PathBuf,

    /// Rendered error
    pub message: String,
}

/// Everything a batch run produced, in processing order.
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    pub results: Vec<Categorization<T>>,
    pub failures: Vec<BatchFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Aggregate counts and token totals.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            images: self.results.len(),
            input_tokens: self.results.iter().map(|c| u64::from(c.input_tokens)).sum(),
            output_tokens: self.results.iter().map(|c| u64::from(c.output_tokens)).sum(),
            failed: self.failures.len(),
        }
    }
}

/// Totals across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Images categorized successfully
    pub images: usize,
    /// Sum of input tokens
    pub input_tokens: u64,
    /// Sum of output tokens
    pub output_tokens: u64,
    /// Images skipped after a non-fatal failure
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TOTAL IMAGES: {}", self.images)?;
        writeln!(f, "TOTAL INPUT TOKENS: {}", self.input_tokens)?;
        write!(f, "TOTAL OUTPUT TOKENS: {}", self.output_tokens)?;
        if self.failed > 0 {
            write!(f, "\nFAILED IMAGES: {}", self.failed)?;
        }
        Ok(())
    }
}
