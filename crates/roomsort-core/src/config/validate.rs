//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.input.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "input.supported_formats must not be empty".into(),
            ));
        }
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.model must not be empty".into(),
            ));
        }
        if self.model.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.endpoint must not be empty".into(),
            ));
        }
        if self.model.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "model.timeout_ms must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}
