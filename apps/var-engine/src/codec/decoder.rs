//! Request decoder.
//!
//! Turns a raw payload into a [`RiskRequest`] or an error. A request is either
//! fully populated or not produced at all.
//!
//! Once every required field is present the transaction type is checked
//! first, so an unrecognized `t` is reported whatever the other fields hold.

use serde_json::{Map, Value};

use crate::error::{DecodeError, RiskError};
use crate::models::{AssetParameter, RiskRequest, Signal, TransactionType};

/// Simulation count field.
pub const FIELD_SIMULATION_COUNT: &str = "d";
/// Transaction type field.
pub const FIELD_TRANSACTION_TYPE: &str = "t";
/// Buy signal field.
pub const FIELD_BUY_LIST: &str = "buy_list";
/// Sell signal field.
pub const FIELD_SELL_LIST: &str = "sell_list";
/// Mean field.
pub const FIELD_MEAN_LIST: &str = "mean_list";
/// Standard deviation field.
pub const FIELD_STD_LIST: &str = "std_list";

/// Required fields, in the order their absence is reported.
pub const REQUIRED_FIELDS: [&str; 6] = [
    FIELD_SIMULATION_COUNT,
    FIELD_TRANSACTION_TYPE,
    FIELD_BUY_LIST,
    FIELD_SELL_LIST,
    FIELD_MEAN_LIST,
    FIELD_STD_LIST,
];

/// Decode a raw JSON payload.
pub fn decode_request(payload: &[u8]) -> Result<RiskRequest, RiskError> {
    let value: Value = serde_json::from_slice(payload).map_err(|e| DecodeError::Malformed {
        diagnostic: e.to_string(),
    })?;
    decode_value(value)
}

/// Decode an already-parsed JSON document.
pub fn decode_value(value: Value) -> Result<RiskRequest, RiskError> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(DecodeError::Malformed {
                diagnostic: format!("expected a JSON object, got {}", json_kind(&other)),
            }
            .into());
        }
    };

    if let Some(field) = REQUIRED_FIELDS
        .into_iter()
        .find(|f| !fields.contains_key(*f))
    {
        return Err(DecodeError::MissingField { field }.into());
    }

    let discriminator = take(&mut fields, FIELD_TRANSACTION_TYPE)?;
    let transaction_type = TransactionType::from_json(&discriminator)?;
    let simulation_count = decode_count(&take(&mut fields, FIELD_SIMULATION_COUNT)?)?;
    let buy_signals = decode_signals(FIELD_BUY_LIST, take(&mut fields, FIELD_BUY_LIST)?)?;
    let sell_signals = decode_signals(FIELD_SELL_LIST, take(&mut fields, FIELD_SELL_LIST)?)?;
    let means = decode_parameters(FIELD_MEAN_LIST, take(&mut fields, FIELD_MEAN_LIST)?)?;
    let std_devs = decode_parameters(FIELD_STD_LIST, take(&mut fields, FIELD_STD_LIST)?)?;

    Ok(RiskRequest::new(
        simulation_count,
        transaction_type,
        buy_signals,
        sell_signals,
        means,
        std_devs,
    )?)
}

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn take(fields: &mut Map<String, Value>, field: &'static str) -> Result<Value, DecodeError> {
    fields
        .remove(field)
        .ok_or(DecodeError::MissingField { field })
}

/// Integer, float (truncated toward zero), or integer string. Sign is
/// checked later.
fn decode_count(value: &Value) -> Result<i64, DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidField {
        field: FIELD_SIMULATION_COUNT,
        reason,
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64().map(f64::trunc) {
                Some(f) if f >= I64_LOWER && f < I64_UPPER => Ok(f as i64),
                _ => Err(invalid(format!("{n} is out of range"))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(format!("'{s}' is not an integer: {e}"))),
        other => Err(invalid(format!("expected an integer, got {}", json_kind(other)))),
    }
}

fn decode_array(field: &'static str, value: Value) -> Result<Vec<Value>, DecodeError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(DecodeError::InvalidField {
            field,
            reason: format!("expected an array, got {}", json_kind(&other)),
        }),
    }
}

fn decode_signals(field: &'static str, value: Value) -> Result<Vec<Signal>, DecodeError> {
    Ok(decode_array(field, value)?
        .iter()
        .map(Signal::from_json)
        .collect())
}

fn decode_parameters(
    field: &'static str,
    value: Value,
) -> Result<Vec<AssetParameter>, DecodeError> {
    Ok(decode_array(field, value)?
        .into_iter()
        .map(AssetParameter::new)
        .collect())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
