// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::cast_possible_wrap
    )
)]

//! VaR Engine - Monte Carlo Value-at-Risk
//!
//! Estimates the 95% and 99% Value-at-Risk thresholds of each asset selected
//! by a buy or sell signal vector, by drawing Gaussian returns and reading the
//! thresholds off the sorted samples.
//!
//! # Pipeline
//!
//! - `codec::decoder`: payload to typed request
//! - `engine::selector`: transaction type to signal vector
//! - `engine::simulation`: Gaussian draws per active asset
//! - `engine::quantile`: nearest-rank VaR95 / VaR99
//! - `codec::encoder`: result or single classified error
//!
//! # Boundaries
//!
//! - `infrastructure::http`: axum service (`var-engine` binary)
//! - `var-engine-cgi` binary: one request on stdin, one response on stdout

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Request decoding and response encoding.
pub mod codec;

/// Configuration loading and validation.
pub mod config;

/// Simulation pipeline.
pub mod engine;

/// Error taxonomy.
pub mod error;

/// Inbound adapters.
pub mod infrastructure;

/// Request and result types.
pub mod models;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

pub use codec::{ErrorResponse, RiskResponse};
pub use config::Config;
pub use engine::VarEngine;
pub use error::{DecodeError, ErrorClass, ErrorCode, ParameterError, RiskError};
pub use models::{RiskRequest, RiskResult, VarThresholds};
