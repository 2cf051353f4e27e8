//! Observability module for Prometheus metrics.
//!
//! Recording functions are cheap no-ops until [`init_metrics`] installs an
//! exporter, so the engine records unconditionally.

mod metrics;

pub use metrics::{
    MetricsError, init_metrics, record_active_assets, record_request, record_samples_drawn,
};
