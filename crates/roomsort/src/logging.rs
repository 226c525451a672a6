//! Logging setup for the CLI.
//!
//! Logs go to stderr so stdout carries only the per-image report, the summary
//! and JSON written without `--output`.

use roomsort_core::config::LoggingConfig;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Effective logging settings after CLI flags are applied to the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// DEBUG instead of INFO
    pub verbose: bool,
    /// JSON objects instead of human-readable lines
    pub json: bool,
}

impl LogSettings {
    /// Flags can only turn settings on; they never silence a config choice.
    pub fn resolve(config: &LoggingConfig, verbose_override: bool, json_override: bool) -> Self {
        let level = config.level.to_lowercase();
        Self {
            verbose: verbose_override || level == "debug" || level == "trace",
            json: json_override || config.format.eq_ignore_ascii_case("json"),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the level.
pub fn init(settings: LogSettings) {
    let default_level = if settings.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section, with CLI overrides.
pub fn init_from_config(
    config: &roomsort_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    init(LogSettings::resolve(
        &config.logging,
        verbose_override,
        json_logs_override,
    ));
}
