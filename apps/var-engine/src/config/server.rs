//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// `bind_address:http_port`.
    #[must_use]
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }
}

pub(crate) const fn default_http_port() -> u16 {
    8080
}

pub(crate) fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

pub(crate) const fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}
