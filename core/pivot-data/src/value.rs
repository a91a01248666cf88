//! FILENAME: core/pivot-data/src/value.rs
//! PURPOSE: Defines the scalar value held by a record field.
//! CONTEXT: Values arrive from the host data source as loosely typed JSON
//! scalars. Everything downstream (keys, filters, aggregators) works through
//! the two coercions defined here: `to_number` and `key_string`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar from a record field.
///
/// Deserializes untagged, so a JSON `null`, `true`, `12.5` or `"North"` map
/// straight onto the matching variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or empty text. Blank values are skipped when sampling a field
    /// for type inference.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion used by every aggregator.
    ///
    /// Text is parsed by its leading number (`"12abc"` is 12). Anything that
    /// does not yield a number, including booleans, null and NaN, becomes 0.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) if n.is_nan() => 0.0,
            Value::Number(n) => *n,
            Value::Text(s) => parse_number_prefix(s).unwrap_or(0.0),
            Value::Bool(_) | Value::Null => 0.0,
        }
    }

    /// String form used for composite keys and distinct counting.
    /// Null coerces to the empty string.
    pub fn key_string(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Number(n) => Cow::Owned(number_to_string(*n)),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Parses the longest numeric prefix of `text` after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent, and the literal `Infinity`. Returns `None` when no digits are
/// found.
pub fn parse_number_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digit_count += frac_end - (end + 1);
        end = frac_end;
    }

    if digit_count == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Renders a number the way it is shown inside keys and filter lists:
/// shortest round-trip digits, integral values without a fraction, `-0` as
/// `0`, and exponent notation (`1e-7`, `1.5e+21`) outside `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let label = if n > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        format!("{}", n)
    } else {
        let exponential = format!("{:e}", n);
        match exponential.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exponential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(Value::from(2.0).to_number(), 2.0);
        assert_eq!(Value::from("3").to_number(), 3.0);
        assert_eq!(Value::from("12abc").to_number(), 12.0);
        assert_eq!(Value::from("x").to_number(), 0.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::from(true).to_number(), 0.0);
        assert_eq!(Value::Number(f64::NAN).to_number(), 0.0);
    }

    #[test]
    fn test_parse_number_prefix() {
        assert_eq!(parse_number_prefix("  -4.5kg"), Some(-4.5));
        assert_eq!(parse_number_prefix(".5"), Some(0.5));
        assert_eq!(parse_number_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_number_prefix("1e"), Some(1.0));
        assert_eq!(parse_number_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number_prefix("."), None);
        assert_eq!(parse_number_prefix(""), None);
        assert_eq!(parse_number_prefix("abc"), None);
    }

    #[test]
    fn test_key_string() {
        assert_eq!(Value::Null.key_string(), "");
        assert_eq!(Value::from(1.0).key_string(), "1");
        assert_eq!(Value::from(1.5).key_string(), "1.5");
        assert_eq!(Value::from(-0.0).key_string(), "0");
        assert_eq!(Value::from(false).key_string(), "false");
        assert_eq!(Value::from("North").key_string(), "North");
    }

    #[test]
    fn test_number_to_string_exponent_range() {
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(-2.5e-8), "-2.5e-8");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e300), "1.5e+300");
        assert_eq!(number_to_string(123.456), "123.456");
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(Value::from(1e-7).key_string(), Value::text("1e-7").key_string());
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 12.5, "North"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Number(12.5),
                Value::text("North"),
            ]
        );
    }

    #[test]
    fn test_blank() {
        assert!(Value::Null.is_blank());
        assert!(Value::text("").is_blank());
        assert!(!Value::from(0.0).is_blank());
        assert!(!Value::from(false).is_blank());
    }
}
