//! Infrastructure Layer
//!
//! Inbound adapters exposing the engine to callers:
//!
//! - `http/`: axum REST API
//!
//! The stdin/stdout adapter lives in the `var-engine-cgi` binary.

pub mod http;
