//! Decoded VaR request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, ParameterError, RiskError};

/// Which signal vector drives the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Simulate assets flagged in `buy_list`.
    Buy,
    /// Simulate assets flagged in `sell_list`.
    Sell,
}

impl TransactionType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl TransactionType {
    /// Interpret the raw `t` field.
    ///
    /// Non-string values are rendered as JSON text, which never matches.
    pub fn from_json(value: &Value) -> Result<Self, RiskError> {
        match value {
            Value::String(s) => s.parse(),
            other => Err(RiskError::InvalidTransactionType {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = RiskError;

    /// Exact, case-sensitive match on `buy` / `sell`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(RiskError::InvalidTransactionType {
                value: other.to_string(),
            }),
        }
    }
}

/// One entry of a buy or sell signal vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The asset is simulated.
    Active,
    /// The asset is skipped.
    Inactive,
}

impl Signal {
    /// Interpret a raw JSON element.
    ///
    /// Only a value equal to 1 (`1`, `1.0` or `true`) activates an asset;
    /// every other element is inactive rather than an error.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let active = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            _ => false,
        };
        if active { Self::Active } else { Self::Inactive }
    }

    /// Whether the asset is simulated.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<u8> for Signal {
    fn from(value: u8) -> Self {
        if value == 1 { Self::Active } else { Self::Inactive }
    }
}

/// A per-asset mean or standard deviation, kept as received.
///
/// Conversion to `f64` is deferred to the simulation engine so that values of
/// inactive assets are never inspected, and so that a bad value of an active
/// asset is reported with its index.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetParameter(Value);

impl AssetParameter {
    /// Wrap a raw JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Convert to a finite float.
    ///
    /// Numbers, booleans and numeric strings (surrounding whitespace allowed)
    /// convert; anything else is [`ParameterError::NotNumeric`].
    pub fn to_f64(&self, field: &'static str) -> Result<f64, ParameterError> {
        let not_numeric = || ParameterError::NotNumeric {
            field,
            value: self.0.to_string(),
        };

        let value = match &self.0 {
            Value::Number(n) => n.as_f64().ok_or_else(not_numeric)?,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_numeric())?,
            Value::Null | Value::Array(_) | Value::Object(_) => return Err(not_numeric()),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ParameterError::NonFinite {
                field,
                value: value.to_string(),
            })
        }
    }
}

impl From<f64> for AssetParameter {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

/// A decoded VaR request.
///
/// Index `i` of every per-asset sequence refers to the same asset; the
/// sequences always have equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRequest {
    simulation_count: i64,
    transaction_type: TransactionType,
    buy_signals: Vec<Signal>,
    sell_signals: Vec<Signal>,
    means: Vec<AssetParameter>,
    std_devs: Vec<AssetParameter>,
}

impl RiskRequest {
    /// Assemble a request, checking that every per-asset sequence has the
    /// length of `buy_signals`.
    pub fn new(
        simulation_count: i64,
        transaction_type: TransactionType,
        buy_signals: Vec<Signal>,
        sell_signals: Vec<Signal>,
        means: Vec<AssetParameter>,
        std_devs: Vec<AssetParameter>,
    ) -> Result<Self, DecodeError> {
        let expected = buy_signals.len();
        let others = [
            ("sell_list", sell_signals.len()),
            ("mean_list", means.len()),
            ("std_list", std_devs.len()),
        ];

        if let Some((field, actual)) = others.into_iter().find(|(_, len)| *len != expected) {
            return Err(DecodeError::LengthMismatch {
                field,
                expected,
                actual,
            });
        }

        Ok(Self {
            simulation_count,
            transaction_type,
            buy_signals,
            sell_signals,
            means,
            std_devs,
        })
    }

    /// Number of draws per active asset, as received (validated later).
    #[must_use]
    pub const fn simulation_count(&self) -> i64 {
        self.simulation_count
    }

    /// Which signal vector drives the simulation.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Buy signal vector.
    #[must_use]
    pub fn buy_signals(&self) -> &[Signal] {
        &self.buy_signals
    }

    /// Sell signal vector.
    #[must_use]
    pub fn sell_signals(&self) -> &[Signal] {
        &self.sell_signals
    }

    /// Mean return per asset.
    #[must_use]
    pub fn means(&self) -> &[AssetParameter] {
        &self.means
    }

    /// Standard deviation of returns per asset.
    #[must_use]
    pub fn std_devs(&self) -> &[AssetParameter] {
        &self.std_devs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("buy".parse::<TransactionType>().unwrap(), TransactionType::Buy);
        assert_eq!(
            "sell".parse::<TransactionType>().unwrap(),
            TransactionType::Sell
        );
    }

    #[test_case("BUY" ; "uppercase")]
    #[test_case(" buy" ; "leading whitespace")]
    #[test_case("hold" ; "unknown")]
    #[test_case("" ; "empty")]
    fn test_transaction_type_rejects(raw: &str) {
        let err = raw.parse::<TransactionType>().unwrap_err();
        assert!(matches!(err, RiskError::InvalidTransactionType { ref value } if value == raw));
    }

    #[test_case(json!(1), Signal::Active ; "integer one")]
    #[test_case(json!(1.0), Signal::Active ; "float one")]
    #[test_case(json!(true), Signal::Active ; "true")]
    #[test_case(json!(0), Signal::Inactive ; "zero")]
    #[test_case(json!(2), Signal::Inactive ; "two")]
    #[test_case(json!(-1), Signal::Inactive ; "minus one")]
    #[test_case(json!("1"), Signal::Inactive ; "string one")]
    #[test_case(json!(null), Signal::Inactive ; "null")]
    fn test_signal_from_json(value: Value, expected: Signal) {
        assert_eq!(Signal::from_json(&value), expected);
    }

    #[test_case(json!(0.25), 0.25 ; "number")]
    #[test_case(json!(-3), -3.0 ; "negative integer")]
    #[test_case(json!("0.5"), 0.5 ; "numeric string")]
    #[test_case(json!(" 1e-3 "), 0.001 ; "padded exponent string")]
    #[test_case(json!(true), 1.0 ; "boolean")]
    fn test_asset_parameter_converts(value: Value, expected: f64) {
        let param = AssetParameter::new(value);
        assert_eq!(param.to_f64("mean").unwrap(), expected);
    }

    #[test_case(json!("abc") ; "word")]
    #[test_case(json!(null) ; "null")]
    #[test_case(json!([1.0]) ; "array")]
    #[test_case(json!({"v": 1.0}) ; "object")]
    fn test_asset_parameter_not_numeric(value: Value) {
        let err = AssetParameter::new(value).to_f64("std_dev").unwrap_err();
        assert!(matches!(err, ParameterError::NotNumeric { field: "std_dev", .. }));
    }

    #[test_case("nan" ; "nan")]
    #[test_case("inf" ; "infinity")]
    #[test_case("-inf" ; "negative infinity")]
    fn test_asset_parameter_non_finite(raw: &str) {
        let err = AssetParameter::new(json!(raw)).to_f64("mean").unwrap_err();
        assert!(matches!(err, ParameterError::NonFinite { field: "mean", .. }));
    }

    #[test_case(json!(5), "5" ; "number")]
    #[test_case(json!(null), "null" ; "null")]
    #[test_case(json!(["buy"]), "[\"buy\"]" ; "array")]
    #[test_case(json!("SELL"), "SELL" ; "string kept verbatim")]
    fn test_transaction_type_from_json_rejects(t: Value, rendered: &str) {
        let err = TransactionType::from_json(&t).unwrap_err();
        assert!(matches!(err, RiskError::InvalidTransactionType { ref value } if value == rendered));
    }

    #[test]
    fn test_transaction_type_from_json_accepts() {
        assert_eq!(
            TransactionType::from_json(&json!("sell")).unwrap(),
            TransactionType::Sell
        );
    }

    fn request(sell: usize, means: usize, stds: usize) -> Result<RiskRequest, DecodeError> {
        RiskRequest::new(
            100,
            TransactionType::Buy,
            vec![Signal::Active; 3],
            vec![Signal::Inactive; sell],
            vec![AssetParameter::from(0.0); means],
            vec![AssetParameter::from(1.0); stds],
        )
    }

    #[test]
    fn test_new_accepts_equal_lengths() {
        let req = request(3, 3, 3).unwrap();
        assert_eq!(req.buy_signals().len(), 3);
        assert_eq!(req.std_devs()[2].to_f64("std_dev").unwrap(), 1.0);
        assert!(
            RiskRequest::new(1, TransactionType::Sell, vec![], vec![], vec![], vec![]).is_ok()
        );
    }

    #[test]
    fn test_new_reports_first_mismatch() {
        let err = request(3, 2, 2).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LengthMismatch {
                field: "mean_list",
                expected: 3,
                actual: 2,
            }
        );
    }
}
