//! # Built-in Scalar Coercers
//!
//! Conversion functions from raw JSON values to the typed value a field
//! declares. Each function takes the raw value by reference and either
//! returns the converted value or a [`CoerceError::Invalid`] explaining why
//! the value does not fit.
//!
//! ## Conversion Rules
//!
//! | Coercer    | Accepts                                               |
//! |------------|-------------------------------------------------------|
//! | `string`   | strings; other values rendered as (JSON) text         |
//! | `integer`  | `i64` integers; floats (truncated); integer strings   |
//! | `float`    | numbers; numeric strings                              |
//! | `boolean`  | the truthy and falsy sets below, `1`/`0` numbers      |
//! | `any`      | everything, unchanged                                 |
//! | `mapping`  | objects                                               |
//! | `sequence` | arrays                                                |
//! | `date`     | `YYYY-MM-DD` or RFC 3339 strings, normalized to a date |
//!
//! Null never reaches a coercer from the engine: nullability is decided
//! before coercion. Called directly, every coercer except `any` rejects it.

use chrono::{DateTime, NaiveDate};
use serde_json::{Number, Value};

use crate::error::CoerceError;

/// Values accepted as `true` by [`to_boolean`].
pub const TRUTHY: &[&str] = &["true", "True", "yes", "1"];

/// Values accepted as `false` by [`to_boolean`].
pub const FALSEY: &[&str] = &["false", "False", "no", "0"];

/// Format used for normalized dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Short name of a JSON value's kind, used in error reasons.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

/// Return the value unchanged.
pub fn identity(value: &Value) -> Result<Value, CoerceError> {
    Ok(value.clone())
}

/// Coerce to a string. Mappings and sequences render as compact JSON text.
pub fn to_string(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Null => Err(CoerceError::invalid("cannot render null as a string")),
        other => Ok(Value::String(other.to_string())),
    }
}

/// Coerce to a signed 64-bit integer.
pub fn to_integer(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Number(n) => {
            if n.is_i64() {
                return Ok(value.clone());
            }
            if n.is_u64() {
                return Err(CoerceError::invalid(format!("{n} is out of integer range")));
            }
            let f = n
                .as_f64()
                .ok_or_else(|| CoerceError::invalid(format!("{n} is not a number")))?;
            float_to_integer(f)
        }
        Value::String(s) => {
            let parsed: i64 = s.trim().parse()?;
            Ok(Value::from(parsed))
        }
        other => Err(CoerceError::invalid(format!(
            "expected an integer, found {}",
            kind_of(other)
        ))),
    }
}

fn float_to_integer(f: f64) -> Result<Value, CoerceError> {
    let truncated = f.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return Err(CoerceError::invalid(format!("{f} is out of integer range")));
    }
    Ok(Value::from(truncated as i64))
}

/// Coerce to a 64-bit float.
pub fn to_float(value: &Value) -> Result<Value, CoerceError> {
    let f = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CoerceError::invalid(format!("{n} is not a number")))?,
        Value::String(s) => s.trim().parse::<f64>()?,
        other => {
            return Err(CoerceError::invalid(format!(
                "expected a float, found {}",
                kind_of(other)
            )))
        }
    };
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| CoerceError::invalid(format!("{f} is not a finite number")))
}

/// Coerce to a boolean using the truthy/falsy sets.
pub fn to_boolean(value: &Value) -> Result<Value, CoerceError> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) if TRUTHY.contains(&s.as_str()) => Some(true),
        Value::String(s) if FALSEY.contains(&s.as_str()) => Some(false),
        _ => None,
    };
    parsed
        .map(Value::Bool)
        .ok_or_else(|| CoerceError::invalid(format!("{value} is not a recognized boolean")))
}

/// Require a mapping.
pub fn to_mapping(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Object(_) => Ok(value.clone()),
        other => Err(CoerceError::invalid(format!(
            "expected a mapping, found {}",
            kind_of(other)
        ))),
    }
}

/// Require a sequence.
pub fn to_sequence(value: &Value) -> Result<Value, CoerceError> {
    match value {
        Value::Array(_) => Ok(value.clone()),
        other => Err(CoerceError::invalid(format!(
            "expected a sequence, found {}",
            kind_of(other)
        ))),
    }
}

/// Parse a calendar date and normalize it to `YYYY-MM-DD`.
///
/// Accepts plain dates (`2014-01-01`) and RFC 3339 timestamps, whose date
/// part in their own offset is kept.
pub fn to_date(value: &Value) -> Result<Value, CoerceError> {
    let s = match value {
        Value::String(s) => s.trim(),
        other => {
            return Err(CoerceError::invalid(format!(
                "expected a date string, found {}",
                kind_of(other)
            )))
        }
    };
    let date = match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(d) => d,
        Err(_) => DateTime::parse_from_rfc3339(s)?.date_naive(),
    };
    Ok(Value::String(date.format(DATE_FORMAT).to_string()))
}
