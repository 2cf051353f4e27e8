//! HTTP/REST API adapter.
//!
//! Inbound adapter that hands raw request bodies to the engine.

mod controller;
mod response;

pub use controller::{AppState, create_router};
pub use response::HealthResponse;
