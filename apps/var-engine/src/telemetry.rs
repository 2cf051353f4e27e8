//! Tracing subscriber setup.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//! - `observability.logging.level`: default level for `var_engine`
//! - `observability.logging.format`: `pretty` or `json`

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard output (long-running service).
    Stdout,
    /// Standard error (one-shot adapter whose stdout carries the response).
    Stderr,
}

/// Error type for subscriber initialization.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The level directive could not be parsed.
    #[error("invalid log directive '{directive}': {reason}")]
    InvalidDirective {
        /// The rejected directive.
        directive: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Build the filter: `RUST_LOG` if set, else `var_engine=<level>`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = format!("var_engine={}", config.level.to_lowercase());
    EnvFilter::try_new(&directive).map_err(|e| TelemetryError::InvalidDirective {
        directive,
        reason: e.to_string(),
    })
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingConfig, target: LogTarget) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let writer = match target {
        LogTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.with_ansi(target == LogTarget::Stdout).try_init()
    };

    result.map_err(|e| TelemetryError::SubscriberError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_targets_crate_only() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "json".to_string(),
        };
        let rendered = build_filter(&config).unwrap().to_string();
        assert!(rendered.contains("var_engine=warn"), "{rendered}");
        assert!(!rendered.contains("tower_http"), "{rendered}");
    }

    #[test]
    fn test_build_filter_from_config() {
        // RUST_LOG may be set by the test runner; either way a filter is built
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            format: "pretty".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }
}
