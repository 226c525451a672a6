//! CLI enum types for the categorize command: property, output format, MIME policy.

use clap::ValueEnum;
use roomsort_core::{MimePolicy, OutputFormat as CoreOutputFormat, PropertyType};

/// Property taxonomy to classify into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Property {
    /// Hotel rooms and facilities
    Hotel,
    /// Apartment rooms and views
    Apartment,
}

impl From<Property> for PropertyType {
    fn from(p: Property) -> Self {
        match p {
            Property::Hotel => PropertyType::Hotel,
            Property::Apartment => PropertyType::Apartment,
        }
    }
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// How the image MIME type sent to the model is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MimeMode {
    /// Sniff the file contents
    Content,
    /// Trust the file extension
    Extension,
    /// Always send image/png
    FixedPng,
}

impl From<MimeMode> for MimePolicy {
    fn from(m: MimeMode) -> Self {
        match m {
            MimeMode::Content => MimePolicy::Content,
            MimeMode::Extension => MimePolicy::Extension,
            MimeMode::FixedPng => MimePolicy::FixedPng,
        }
    }
}
