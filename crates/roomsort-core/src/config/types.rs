//! Sub-configuration structs with their defaults.

use crate::pipeline::encode::MimePolicy;
use crate::taxonomy::PropertyType;
use serde::{Deserialize, Serialize};

/// Where images come from and how they are classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned when no input path is given on the command line
    pub dir: String,

    /// File extensions accepted by discovery (compared case-insensitively)
    pub supported_formats: Vec<String>,

    /// Taxonomy used when the command line does not pick one
    pub property_type: PropertyType,

    /// How the MIME type sent with each image is chosen
    pub mime_policy: MimePolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: "images".to_string(),
            supported_formats: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            property_type: PropertyType::Apartment,
            mime_policy: MimePolicy::Content,
        }
    }
}

/// Remote model settings.
///
/// Sampling is always deterministic, so there is no temperature setting;
/// unknown keys such as `temperature` are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Gemini API base URL (without the `/models/...` suffix)
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Per-request timeout in milliseconds. Unset keeps the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: "${GOOGLE_API_KEY}".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_ms: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
