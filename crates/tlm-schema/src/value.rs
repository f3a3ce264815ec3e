//! Raw telemetry values
//!
//! Decoded packets carry scalar values of mixed JSON type. [`RawValue`] keeps
//! the value exactly as received; conversion to display text happens only
//! when a table cell is produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single scalar value as delivered by the telemetry or configuration source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Boolean flag
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text (also used for numbers the decoder emitted as strings)
    Str(String),
}

impl RawValue {
    /// Interpret the value as an index, the way a base-10 `parseInt` would.
    ///
    /// Leading whitespace is skipped and an optional sign accepted, then as
    /// many decimal digits as are present are consumed. Floats truncate
    /// toward zero. Booleans and strings without leading digits yield `None`.
    pub fn parse_index(&self) -> Option<i64> {
        match self {
            RawValue::Int(n) => Some(*n),
            RawValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            RawValue::Float(_) | RawValue::Bool(_) => None,
            RawValue::Str(s) => parse_leading_int(s),
        }
    }

    /// Borrow the text if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the JSON type carried, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Str(_) => "str",
        }
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_coercion() {
        assert_eq!(RawValue::from("3.7").to_string(), "3.7");
        assert_eq!(RawValue::Int(-12).to_string(), "-12");
        assert_eq!(RawValue::Float(3.7).to_string(), "3.7");
        assert_eq!(RawValue::Float(1.0).to_string(), "1");
        assert_eq!(RawValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_parse_index_like_parse_int() {
        assert_eq!(RawValue::from("1").parse_index(), Some(1));
        assert_eq!(RawValue::from("  2").parse_index(), Some(2));
        assert_eq!(RawValue::from("3abc").parse_index(), Some(3));
        assert_eq!(RawValue::from("1.9").parse_index(), Some(1));
        assert_eq!(RawValue::from("-1").parse_index(), Some(-1));
        assert_eq!(RawValue::from("+4").parse_index(), Some(4));
        assert_eq!(RawValue::from("abc").parse_index(), None);
        assert_eq!(RawValue::from("").parse_index(), None);
        assert_eq!(RawValue::from("-").parse_index(), None);
        assert_eq!(RawValue::Float(2.9).parse_index(), Some(2));
        assert_eq!(RawValue::Int(0).parse_index(), Some(0));
        assert_eq!(RawValue::Bool(true).parse_index(), None);
    }

    #[test]
    fn test_untagged_json() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[true, 5, 2.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Bool(true),
                RawValue::Int(5),
                RawValue::Float(2.5),
                RawValue::Str("x".into()),
            ]
        );
    }
}
