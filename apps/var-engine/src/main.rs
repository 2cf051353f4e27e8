//! VaR Engine Binary
//!
//! Serves the Monte Carlo VaR engine over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin var-engine
//! ```
//!
//! # Environment Variables
//!
//! - `VAR_ENGINE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter (default: `var_engine=<observability.logging.level>`)

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use var_engine::config::{self, Config};
use var_engine::engine::VarEngine;
use var_engine::infrastructure::http::{AppState, create_router};
use var_engine::observability;
use var_engine::telemetry::{self, LogTarget};

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = config::load_from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.observability.logging, LogTarget::Stdout)?;

    log_config(&config);

    if config.observability.metrics.enabled {
        observability::init_metrics(&config.observability.metrics)?;
    }

    let engine = VarEngine::new(config.engine.clone())?;
    let state = AppState::new(engine, env!("CARGO_PKG_VERSION"));
    let app = create_router(state, config.server.max_body_bytes);

    let http_addr = config.server.socket_address();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/var");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("VaR engine stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn log_config(config: &Config) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_simulation_count = config.engine.max_simulation_count,
        min_parallel_assets = config.engine.min_parallel_assets,
        max_threads = config.engine.max_threads,
        seeded = config.engine.seed.is_some(),
        "Starting VaR engine"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Draining in-flight requests"
    );
}
