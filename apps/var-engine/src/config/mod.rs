//! Configuration for the VaR engine.
//!
//! Configuration is read once at startup from YAML, with `${VAR}` and
//! `${VAR:-default}` environment interpolation, validated, and then passed
//! explicitly to the engine and the HTTP layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use var_engine::config::load_config;
//!
//! let config = load_config(Some("config.yaml"))?;
//! println!("max draws: {}", config.engine.max_simulation_count);
//! ```

mod engine;
mod observability;
mod server;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use engine::EngineConfig;
pub use observability::{LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use server::ServerConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "VAR_ENGINE_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Simulation engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging and metrics configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;
    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the configuration named by the environment.
///
/// An explicit `VAR_ENGINE_CONFIG` must exist. Without it, `config.yaml` is
/// used when present and the built-in defaults otherwise.
pub fn load_from_env() -> Result<Config, ConfigError> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_config(&path),
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        _ => Ok(Config::default()),
    }
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}`. Unset or empty variables
/// without a default become the empty string.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.engine.max_simulation_count == 0 {
        return Err(ConfigError::ValidationError(
            "engine.max_simulation_count must be at least 1".to_string(),
        ));
    }

    if config.engine.min_parallel_assets == 0 {
        return Err(ConfigError::ValidationError(
            "engine.min_parallel_assets must be at least 1".to_string(),
        ));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_body_bytes must be positive".to_string(),
        ));
    }

    let logging = &config.observability.logging;
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {LOG_LEVELS:?}"
        )));
    }
    if !LOG_FORMATS.contains(&logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_addr.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_addr '{}' is not a socket address",
            metrics.listen_addr
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.engine.max_simulation_count, 1_000_000);
        assert_eq!(config.observability.logging.format, "pretty");
        assert!(!config.observability.metrics.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
server:
  http_port: 9000
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
server:
  http_port: 8181
  bind_address: "127.0.0.1"
  max_body_bytes: 1024

engine:
  max_simulation_count: 50000
  min_parallel_assets: 2
  max_threads: 3
  seed: 42

observability:
  logging:
    level: "debug"
    format: "json"
  metrics:
    enabled: true
    listen_addr: "127.0.0.1:9191"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.socket_address(), "127.0.0.1:8181");
        assert_eq!(config.server.max_body_bytes, 1024);
        assert_eq!(config.engine.max_simulation_count, 50_000);
        assert_eq!(config.engine.min_parallel_assets, 2);
        assert_eq!(config.engine.max_threads, 3);
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.observability.logging.level, "debug");
        assert!(config.observability.metrics.enabled);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${VAR_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-warn}";
        assert_eq!(interpolate_env_vars(input), "level: warn");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "seed: ${VAR_ENGINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "seed: ");
    }

    #[test]
    fn test_interpolation_in_full_document() {
        let yaml = r"
engine:
  max_simulation_count: ${VAR_ENGINE_CONFIG_TEST_MISSING_MAX:-2500}
";

        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.engine.max_simulation_count, 2500);
    }

    #[test]
    fn test_validation_zero_ceiling() {
        let yaml = r"
engine:
  max_simulation_count: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero ceiling");
        };
        assert!(err.to_string().contains("max_simulation_count"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_validation_invalid_metrics_addr() {
        let yaml = r"
observability:
  metrics:
    enabled: true
    listen_addr: not-an-address
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid listen_addr");
        };
        assert!(err.to_string().contains("listen_addr"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  seed: 7\n  max_simulation_count: 100").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.engine.seed, Some(7));
        assert_eq!(config.engine.max_simulation_count, 100);
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config("/nonexistent/var-engine/config.yaml") else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_parse_error() {
        let Err(err) = load_config_from_string("engine: [unclosed") else {
            panic!("expected parse error");
        };
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
