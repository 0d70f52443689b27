//! Loosely-typed configuration values.

use std::collections::BTreeMap;
use std::fmt;

/// Nested mapping used as merge input. Merging flattens it into dotted keys.
pub type Object = BTreeMap<String, Value>;

/// A configuration value.
///
/// Every JSON number decodes to [`Value::Number`]; integers passed in from Rust
/// are widened to `f64` so that defaults and file values coerce the same way.
/// [`Value::Object`] never sits directly under a store key: merging flattens it.
/// Objects nested inside arrays are left alone, since arrays are leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number truncated toward zero. Out-of-range values saturate.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64().map(|n| n.trunc() as i64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Converts back to a JSON value. Whole numbers that fit an `i64` become
    /// JSON integers so they deserialize into integer fields.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

// 2^53, the largest range where every integer is exact in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Shortest round-trip digits. Magnitudes at or above 1e21, or below 1e-4,
/// switch to exponent form with a signed, two-digit minimum exponent (`1e+21`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let magnitude = n.abs();
    if !n.is_finite() || magnitude == 0.0 || (1e-4..1e21).contains(&magnitude) {
        return write!(f, "{n}");
    }

    let formatted = format!("{n:e}");
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{mantissa}e{sign}{digits:0>2}")
}

/// Canonical string rendering, as returned by `get_string`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i64, i32, u32, u16, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from(123).to_string(), "123");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("str").to_string(), "str");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_display_extreme_numbers_use_exponent() {
        assert_eq!(Value::from(1e21).to_string(), "1e+21");
        assert_eq!(Value::from(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(Value::from(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Value::from(1e100).to_string(), "1e+100");
        assert_eq!(Value::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::from(0.0001).to_string(), "0.0001");
        assert_eq!(Value::from(0.0).to_string(), "0");
    }

    #[test]
    fn test_display_array_and_object() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1 2 3]");
        let obj = Value::from(json!({"a": 1, "b": "x"}));
        assert_eq!(obj.to_string(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_json_numbers_decode_to_float() {
        assert_eq!(Value::from(json!(8080)), Value::Number(8080.0));
        assert_eq!(Value::from(json!(-2.5)), Value::Number(-2.5));
    }

    #[test]
    fn test_as_i64_truncates_toward_zero() {
        assert_eq!(Value::Number(3.9).as_i64(), Some(3));
        assert_eq!(Value::Number(-3.9).as_i64(), Some(-3));
        assert_eq!(Value::from("3").as_i64(), None);
    }

    #[test]
    fn test_to_json_prefers_integers() {
        assert_eq!(Value::Number(8080.0).to_json(), json!(8080));
        assert_eq!(Value::Number(0.25).to_json(), json!(0.25));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_integers_widen_to_number() {
        assert_eq!(Value::from(7u16), Value::Number(7.0));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
    }
}
