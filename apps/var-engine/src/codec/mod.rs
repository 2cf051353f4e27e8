//! Wire codec for VaR requests and responses.

pub mod decoder;
pub mod encoder;

pub use decoder::{decode_request, decode_value};
pub use encoder::{ErrorResponse, RiskResponse, encode};
