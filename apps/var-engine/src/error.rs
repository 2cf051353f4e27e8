//! Error taxonomy for the VaR engine.
//!
//! Every failure a request can produce is a [`RiskError`]. Each error maps to
//! a stable [`ErrorCode`] (the machine-readable reason sent to callers) and to
//! one of three [`ErrorClass`]es, which is all a transport needs to pick a
//! status code.
//!
//! # Boundary Mapping
//!
//! | Class | Codes | HTTP | Exit |
//! |-------|-------|------|------|
//! | `RequestShape` | `MALFORMED_REQUEST`, `MISSING_FIELD`, `INVALID_FIELD`, `LENGTH_MISMATCH`, `INVALID_SAMPLE_SIZE` | 400 | 2 |
//! | `TransactionType` | `INVALID_TRANSACTION_TYPE` | 422 | 3 |
//! | `Processing` | `SIMULATION_FAILED`, `INTERNAL_ERROR` | 500 | 4 |
//!
//! None of these are retried: every cause is a deterministic function of the
//! request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// Malformed, incomplete, or out-of-range request payload.
    RequestShape,
    /// Unrecognized transaction type discriminator.
    TransactionType,
    /// Failure while simulating an active asset.
    Processing,
}

impl ErrorClass {
    /// HTTP status code for this class.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::RequestShape => 400,
            Self::TransactionType => 422,
            Self::Processing => 500,
        }
    }

    /// Process exit code for this class.
    ///
    /// `0` is success and `1` is left for failures of the adapter itself.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RequestShape => 2,
            Self::TransactionType => 3,
            Self::Processing => 4,
        }
    }

    /// Short label used in logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestShape => "request_shape",
            Self::TransactionType => "transaction_type",
            Self::Processing => "processing",
        }
    }
}

/// Error codes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Payload is not parsable JSON or not a JSON object.
    MalformedRequest,
    /// A required field is absent.
    MissingField,
    /// A field is present but has the wrong shape.
    InvalidField,
    /// Per-asset sequences disagree in length.
    LengthMismatch,
    /// Transaction type is neither `buy` nor `sell`.
    InvalidTransactionType,
    /// Simulation count is non-positive or above the configured ceiling.
    InvalidSampleSize,
    /// Mean or standard deviation of an active asset is unusable.
    SimulationFailed,
    /// The engine failed outside of request processing (worker panic).
    InternalError,
}

impl ErrorCode {
    /// Boundary class of this code.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MalformedRequest
            | Self::MissingField
            | Self::InvalidField
            | Self::LengthMismatch
            | Self::InvalidSampleSize => ErrorClass::RequestShape,
            Self::InvalidTransactionType => ErrorClass::TransactionType,
            Self::SimulationFailed | Self::InternalError => ErrorClass::Processing,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidField => "INVALID_FIELD",
            Self::LengthMismatch => "LENGTH_MISMATCH",
            Self::InvalidTransactionType => "INVALID_TRANSACTION_TYPE",
            Self::InvalidSampleSize => "INVALID_SAMPLE_SIZE",
            Self::SimulationFailed => "SIMULATION_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Request decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload could not be parsed as a JSON object.
    #[error("Malformed request: {diagnostic}")]
    Malformed {
        /// Parser diagnostic.
        diagnostic: String,
    },

    /// A required field is absent.
    #[error("Missing data: '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field is present but cannot be read as the expected shape.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A per-asset sequence has a different length from `buy_list`.
    #[error("Field '{field}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Length of `buy_list`.
        expected: usize,
        /// Length of the offending field.
        actual: usize,
    },
}

impl DecodeError {
    /// Error code for this decode failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed { .. } => ErrorCode::MalformedRequest,
            Self::MissingField { .. } => ErrorCode::MissingField,
            Self::InvalidField { .. } => ErrorCode::InvalidField,
            Self::LengthMismatch { .. } => ErrorCode::LengthMismatch,
        }
    }
}

/// Why a mean or standard deviation could not be used for sampling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// The value is neither a number nor a numeric string.
    #[error("could not convert {field} value {value} to float")]
    NotNumeric {
        /// `mean` or `std_dev`.
        field: &'static str,
        /// JSON rendering of the raw value.
        value: String,
    },

    /// The value converted but is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// `mean` or `std_dev`.
        field: &'static str,
        /// Rendering of the converted value.
        value: String,
    },

    /// Standard deviation below zero.
    #[error("std_dev must be non-negative, got {value}")]
    NegativeStdDev {
        /// Rendering of the negative value.
        value: String,
    },

    /// The sampling distribution rejected the parameters.
    #[error("invalid normal distribution: {reason}")]
    Distribution {
        /// Distribution constructor diagnostic.
        reason: String,
    },
}

/// Top-level error for a single VaR request.
#[derive(Debug, Error)]
pub enum RiskError {
    /// The request could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The transaction type is neither `buy` nor `sell`.
    #[error("Invalid transaction: {value}")]
    InvalidTransactionType {
        /// Rendering of the received discriminator.
        value: String,
    },

    /// The simulation count is unusable.
    #[error("Invalid sample size {requested}: must be between 1 and {max}")]
    InvalidSampleSize {
        /// Requested simulation count.
        requested: i64,
        /// Configured ceiling.
        max: usize,
    },

    /// An active asset could not be simulated.
    #[error("Simulation failed for asset {index}: {source}")]
    Simulation {
        /// Index of the asset in the request sequences.
        index: usize,
        /// Underlying conversion failure.
        #[source]
        source: ParameterError,
    },
}

impl RiskError {
    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Decode(e) => e.code(),
            Self::InvalidTransactionType { .. } => ErrorCode::InvalidTransactionType,
            Self::InvalidSampleSize { .. } => ErrorCode::InvalidSampleSize,
            Self::Simulation { .. } => ErrorCode::SimulationFailed,
        }
    }

    /// Boundary class of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        self.code().class()
    }

    /// Structured context for the error response.
    #[must_use]
    pub fn details(&self) -> BTreeMap<String, String> {
        let mut details = BTreeMap::new();
        match self {
            Self::Decode(DecodeError::Malformed { .. }) => {}
            Self::Decode(
                DecodeError::MissingField { field } | DecodeError::InvalidField { field, .. },
            ) => {
                details.insert("field".to_string(), (*field).to_string());
            }
            Self::Decode(DecodeError::LengthMismatch {
                field,
                expected,
                actual,
            }) => {
                details.insert("field".to_string(), (*field).to_string());
                details.insert("expected".to_string(), expected.to_string());
                details.insert("actual".to_string(), actual.to_string());
            }
            Self::InvalidTransactionType { value } => {
                details.insert("field".to_string(), "t".to_string());
                details.insert("value".to_string(), value.clone());
            }
            Self::InvalidSampleSize { requested, max } => {
                details.insert("field".to_string(), "d".to_string());
                details.insert("value".to_string(), requested.to_string());
                details.insert("max".to_string(), max.to_string());
            }
            Self::Simulation { index, .. } => {
                details.insert("index".to_string(), index.to_string());
            }
        }
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ErrorCode::MalformedRequest, ErrorClass::RequestShape ; "malformed")]
    #[test_case(ErrorCode::MissingField, ErrorClass::RequestShape ; "missing field")]
    #[test_case(ErrorCode::LengthMismatch, ErrorClass::RequestShape ; "length mismatch")]
    #[test_case(ErrorCode::InvalidSampleSize, ErrorClass::RequestShape ; "sample size")]
    #[test_case(ErrorCode::InvalidTransactionType, ErrorClass::TransactionType ; "transaction type")]
    #[test_case(ErrorCode::SimulationFailed, ErrorClass::Processing ; "simulation")]
    fn test_code_classification(code: ErrorCode, class: ErrorClass) {
        assert_eq!(code.class(), class);
    }

    #[test]
    fn test_classes_are_distinguishable_at_every_boundary() {
        let classes = [
            ErrorClass::RequestShape,
            ErrorClass::TransactionType,
            ErrorClass::Processing,
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a.http_status(), b.http_status());
                assert_ne!(a.exit_code(), b.exit_code());
            }
        }
        assert!(classes.iter().all(|c| c.exit_code() > 1));
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let error = RiskError::from(DecodeError::MissingField { field: "mean_list" });

        assert_eq!(error.code(), ErrorCode::MissingField);
        assert!(error.to_string().contains("mean_list"));
        assert_eq!(error.details().get("field").map(String::as_str), Some("mean_list"));
    }

    #[test]
    fn test_simulation_error_carries_index_and_source() {
        let error = RiskError::Simulation {
            index: 3,
            source: ParameterError::NotNumeric {
                field: "mean",
                value: "\"abc\"".to_string(),
            },
        };

        assert_eq!(error.class(), ErrorClass::Processing);
        assert_eq!(error.details().get("index").map(String::as_str), Some("3"));
        assert!(error.to_string().contains("could not convert mean"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            ErrorCode::InvalidTransactionType.to_string(),
            "INVALID_TRANSACTION_TYPE"
        );
    }
}
