//! Response encoder.
//!
//! A request either fully succeeds with both VaR sequences or fully reports
//! one error. There is no partial success.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorClass, ErrorCode, RiskError};
use crate::models::RiskResult;

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status code of the error class (HTTP convention).
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Error class.
    pub class: ErrorClass,
    /// Machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Additional context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl ErrorResponse {
    /// Build a response for an error raised outside request processing.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        let code = ErrorCode::InternalError;
        Self {
            status_code: code.class().http_status(),
            class: code.class(),
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }
}

impl From<&RiskError> for ErrorResponse {
    fn from(error: &RiskError) -> Self {
        let class = error.class();
        Self {
            status_code: class.http_status(),
            class,
            code: error.code(),
            message: error.to_string(),
            details: error.details(),
        }
    }
}

/// Encoded outcome of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RiskResponse {
    /// VaR sequences for every active asset.
    Success(RiskResult),
    /// The single error that stopped the request.
    Failure(ErrorResponse),
}

impl RiskResponse {
    /// HTTP status code.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(e) => e.status_code,
        }
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Success(_) => 0,
            Self::Failure(e) => e.class.exit_code(),
        }
    }

    /// Whether the request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Outcome label for logs and metrics.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure(e) => e.class.label(),
        }
    }
}

/// Encode the outcome of a request.
#[must_use]
pub fn encode(outcome: Result<RiskResult, RiskError>) -> RiskResponse {
    match outcome {
        Ok(result) => RiskResponse::Success(result),
        Err(error) => RiskResponse::Failure(ErrorResponse::from(&error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, ParameterError};
    use serde_json::json;

    #[test]
    fn test_encode_success() {
        let response = encode(Ok(RiskResult {
            var95: vec![0.1, -0.2],
            var99: vec![0.3, 0.0],
        }));

        assert!(response.is_success());
        assert_eq!(response.http_status(), 200);
        assert_eq!(response.exit_code(), 0);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"var95_list": [0.1, -0.2], "var99_list": [0.3, 0.0]})
        );
    }

    #[test]
    fn test_encode_empty_success() {
        let response = encode(Ok(RiskResult::default()));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"var95_list": [], "var99_list": []})
        );
    }

    #[test]
    fn test_encode_missing_field() {
        let response = encode(Err(RiskError::from(DecodeError::MissingField {
            field: "mean_list",
        })));

        assert_eq!(response.http_status(), 400);
        assert_eq!(response.outcome(), "request_shape");
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["code"], "MISSING_FIELD");
        assert_eq!(body["class"], "REQUEST_SHAPE");
        assert_eq!(body["details"]["field"], "mean_list");
        assert!(body.get("var95_list").is_none());
    }

    #[test]
    fn test_encode_transaction_type() {
        let response = encode(Err(RiskError::InvalidTransactionType {
            value: "hold".to_string(),
        }));

        assert_eq!(response.http_status(), 422);
        assert_eq!(response.exit_code(), 3);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["code"], "INVALID_TRANSACTION_TYPE");
        assert_eq!(body["message"], "Invalid transaction: hold");
    }

    #[test]
    fn test_encode_simulation_failure() {
        let response = encode(Err(RiskError::Simulation {
            index: 2,
            source: ParameterError::NotNumeric {
                field: "mean",
                value: "\"x\"".to_string(),
            },
        }));

        assert_eq!(response.http_status(), 500);
        assert_eq!(response.exit_code(), 4);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["code"], "SIMULATION_FAILED");
        assert_eq!(body["details"]["index"], "2");
    }

    #[test]
    fn test_internal_error_response() {
        let response = RiskResponse::Failure(ErrorResponse::internal("worker panicked"));

        assert_eq!(response.http_status(), 500);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(body.get("details").is_none());
    }
}
