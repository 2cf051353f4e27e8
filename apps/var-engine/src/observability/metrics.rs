//! Prometheus metrics for the VaR engine.
//!
//! # Example
//!
//! ```ignore
//! use var_engine::config::MetricsConfig;
//! use var_engine::observability::init_metrics;
//!
//! init_metrics(&MetricsConfig::default()).expect("Failed to initialize metrics");
//! ```

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

use crate::config::MetricsConfig;

/// Latency buckets from 100us to 10s.
const LATENCY_BUCKETS: [f64; 12] = [
    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 10.0,
];

/// Active-asset count buckets.
const ASSET_BUCKETS: [f64; 9] = [0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0];

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Initialize the Prometheus metrics exporter.
///
/// Starts an HTTP listener exposing `/metrics`. Must be called from within a
/// tokio runtime.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| MetricsError::Configuration(format!("{}: {e}", config.listen_addr)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("var_request_duration_seconds".to_string()),
            &LATENCY_BUCKETS,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .set_buckets_for_metric(
            Matcher::Full("var_active_assets".to_string()),
            &ASSET_BUCKETS,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(%addr, "Prometheus metrics exporter started");

    Ok(())
}

/// Record a completed request.
///
/// * `outcome` - `success`, `request_shape`, `transaction_type` or `processing`
/// * `latency_seconds` - Decode-to-encode time in seconds
pub fn record_request(outcome: &'static str, latency_seconds: f64) {
    counter!("var_requests_total", "outcome" => outcome).increment(1);
    histogram!("var_request_duration_seconds", "outcome" => outcome).record(latency_seconds);
}

/// Record how many assets a request simulated.
pub fn record_active_assets(count: usize) {
    histogram!("var_active_assets").record(count as f64);
}

/// Record the number of Gaussian draws made.
pub fn record_samples_drawn(count: u64) {
    counter!("var_samples_drawn_total").increment(count);
}
