//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API over [`VarEngine`].

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::codec::ErrorResponse;
use crate::engine::VarEngine;
use crate::error::{ErrorClass, ErrorCode};

use super::response::HealthResponse;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The VaR engine.
    pub engine: Arc<VarEngine>,
    /// Application version.
    pub version: String,
}

impl AppState {
    /// Create state around an engine.
    pub fn new(engine: VarEngine, version: impl Into<String>) -> Self {
        Self {
            engine: Arc::new(engine),
            version: version.into(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/var", post(compute_var))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// VaR endpoint.
///
/// The body is passed through untouched so that malformed JSON is reported by
/// the request decoder rather than by an extractor rejection.
async fn compute_var(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Request body rejected");
            return body_rejected(&rejection).into_response();
        }
    };

    let engine = Arc::clone(&state.engine);
    match tokio::task::spawn_blocking(move || engine.handle(&body)).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Simulation task failed");
            ErrorResponse::internal(format!("simulation task failed: {e}")).into_response()
        }
    }
}

fn body_rejected(rejection: &BytesRejection) -> ErrorResponse {
    ErrorResponse {
        status_code: rejection.status().as_u16(),
        class: ErrorClass::RequestShape,
        code: ErrorCode::MalformedRequest,
        message: rejection.body_text(),
        details: BTreeMap::new(),
    }
}
