//! Typed access to loosely structured JSON records.
//!
//! Every gate returns `Result<T, ValidationFailure>` so the catalogue and sales
//! stages can chain them with `?`. A JSON `null` is treated the same as an
//! absent field.

use serde_json::{Map, Value};

use crate::diagnostics::{ReasonCode, ValidationFailure};

pub type Record = Map<String, Value>;

/// Views a value as a key-value record
pub fn as_record(value: &Value) -> Option<&Record> {
    value.as_object()
}

/// Reads a field, mapping null to absent
pub fn optional_field<'a>(record: &'a Record, name: &str) -> Option<&'a Value> {
    record.get(name).filter(|value| !value.is_null())
}

/// Reads a field that must be present and non-null
pub fn required_field<'a>(
    record: &'a Record,
    name: &str,
    reason: ReasonCode,
) -> Result<&'a Value, ValidationFailure> {
    optional_field(record, name)
        .ok_or_else(|| ValidationFailure::new(reason, format!("missing '{name}' field")))
}

/// Renders an optional field as text, falling back to `default`
pub fn text_or(record: &Record, name: &str, default: &str) -> String {
    optional_field(record, name)
        .map(display_text)
        .unwrap_or_else(|| default.to_string())
}

/// Strings are taken verbatim, anything else as its JSON text
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Accepts JSON numbers and numeric text; the result is always finite
pub fn coerce_price(value: &Value) -> Result<f64, ValidationFailure> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() => Ok(price),
        _ => Err(ValidationFailure::new(
            ReasonCode::InvalidPrice,
            format!("{} is not a finite number", display_text(value)),
        )),
    }
}

/// Accepts JSON integers, JSON decimals (truncated toward zero) and
/// integer-literal text. Decimal text such as `"3.9"` is rejected.
pub fn coerce_quantity(value: &Value) -> Result<i64, ValidationFailure> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_to_i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        ValidationFailure::new(
            ReasonCode::InvalidQuantity,
            format!("{} is not an integer quantity", display_text(value)),
        )
    })
}

fn truncate_to_i64(value: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the bound below is 2^63
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}
