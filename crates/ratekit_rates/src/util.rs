//! Path-aware JSON field readers.
//!
//! Shape problems (missing field, object where a scalar belongs) map to
//! [`RatesError::MalformedInput`]; scalars that do not parse map to
//! [`RatesError::TypeConversion`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::spec::RatesError;

////////////////////////////////////////////////////////////////////////////////
// #region Paths

/// Join a parent JSON path and a child key (`hotelRates[0]` + `price`).
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Short JSON type name for error messages.
pub fn describe_json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Shapes

/// Fetch a required, non-null member.
pub fn get_required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<&'a Value, RatesError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(RatesError::malformed(
            join_path(parent, key),
            "a required field",
        )),
        Some(value) => Ok(value),
    }
}

/// Fetch an optional member; absent and `null` both yield `None`.
pub fn get_optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

/// View `value` as an object.
pub fn read_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, RatesError> {
    value.as_object().ok_or_else(|| {
        RatesError::malformed(path, format!("an object, found {}", describe_json_kind(value)))
    })
}

/// View `value` as an array.
pub fn read_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, RatesError> {
    value.as_array().ok_or_else(|| {
        RatesError::malformed(path, format!("an array, found {}", describe_json_kind(value)))
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Scalars

/// Render a scalar as text. Numbers and booleans keep their JSON spelling.
pub fn read_text(value: &Value, path: &str) -> Result<String, RatesError> {
    match value {
        Value::String(val) => Ok(val.clone()),
        Value::Number(val) => Ok(val.to_string()),
        Value::Bool(val) => Ok(val.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(RatesError::malformed(
            path,
            format!("a text value, found {}", describe_json_kind(value)),
        )),
    }
}

/// Optional text member; absent or `null` yields an empty string.
pub fn read_optional_text(
    obj: &Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<String, RatesError> {
    match get_optional(obj, key) {
        Some(value) => read_text(value, &join_path(parent, key)),
        None => Ok(String::new()),
    }
}

/// Integer from a JSON integer, an integral float, or an integer string.
pub fn read_i64(value: &Value, path: &str) -> Result<i64, RatesError> {
    let fail = || RatesError::conversion(path, value.to_string(), "integer");
    match value {
        Value::Number(val) => {
            if let Some(n_val) = val.as_i64() {
                return Ok(n_val);
            }
            match val.as_f64() {
                Some(n_val)
                    if n_val.fract() == 0.0
                        && n_val >= i64::MIN as f64
                        && n_val <= i64::MAX as f64 =>
                {
                    Ok(n_val as i64)
                }
                _ => Err(fail()),
            }
        }
        Value::String(val) => val.trim().parse::<i64>().map_err(|_| fail()),
        Value::Bool(_) | Value::Null => Err(fail()),
        Value::Array(_) | Value::Object(_) => Err(RatesError::malformed(
            path,
            format!("an integer, found {}", describe_json_kind(value)),
        )),
    }
}

/// Decimal from a JSON number or numeric string, padded to at least `scale` places.
///
/// Source digits are never dropped: a value with more than `scale`
/// fractional digits keeps all of them.
pub fn read_decimal(value: &Value, path: &str, scale: u32) -> Result<Decimal, RatesError> {
    let fail = || RatesError::conversion(path, value.to_string(), "decimal");
    let c_text = match value {
        Value::Number(val) => val.to_string(),
        Value::String(val) => val.trim().to_string(),
        Value::Bool(_) | Value::Null => return Err(fail()),
        Value::Array(_) | Value::Object(_) => {
            return Err(RatesError::malformed(
                path,
                format!("a number, found {}", describe_json_kind(value)),
            ));
        }
    };

    let mut n_decimal = Decimal::from_str(&c_text)
        .or_else(|_| Decimal::from_scientific(&c_text))
        .map_err(|_| fail())?;
    if n_decimal.scale() < scale {
        n_decimal.rescale(scale);
    }
    Ok(n_decimal)
}

/// Calendar date from `YYYY-MM-DD`, a naive timestamp, or RFC 3339.
///
/// Timestamps keep their own local calendar date; no timezone shift applies.
pub fn read_date(value: &Value, path: &str) -> Result<NaiveDate, RatesError> {
    let Value::String(c_raw) = value else {
        return match value {
            Value::Array(_) | Value::Object(_) => Err(RatesError::malformed(
                path,
                format!("a date string, found {}", describe_json_kind(value)),
            )),
            _ => Err(RatesError::conversion(path, value.to_string(), "date")),
        };
    };
    parse_date_text(c_raw.trim())
        .ok_or_else(|| RatesError::conversion(path, value.to_string(), "date"))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    for c_fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, c_fmt) {
            return Some(datetime.date());
        }
    }
    None
}

/// Truthiness of a flag: booleans as-is, non-zero numbers, `"true"`/`"false"`.
///
/// `null` is false. Any other string or a container is not convertible.
pub fn read_truthy(value: &Value, path: &str) -> Result<bool, RatesError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(val) => Ok(*val),
        Value::Number(val) => Ok(val.as_f64().is_some_and(|n_val| n_val != 0.0)),
        Value::String(val) => {
            let c_val = val.trim();
            if c_val.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if c_val.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(RatesError::conversion(path, value.to_string(), "boolean"))
            }
        }
        Value::Array(_) | Value::Object(_) => {
            Err(RatesError::conversion(path, value.to_string(), "boolean"))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
