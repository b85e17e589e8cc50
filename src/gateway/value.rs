//! Scalar values exchanged with stored procedures

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;

/// A single database scalar, either bound as a procedure argument or read
/// back from a result column.
///
/// Absence is always explicit: `Null` is the only way to ask for a database
/// NULL. `-1`, empty strings and early timestamps are ordinary values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Name of the variant, used in column type errors
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Text(_) => "text",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Decimals without a fractional part and numeric text are accepted,
    /// since drivers commonly hand back `SCOPE_IDENTITY()`-style scalars as
    /// `DECIMAL` or strings. Booleans are flags, never integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            SqlValue::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(0) => Some(false),
            SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Decimal(d) => Some(*d),
            SqlValue::Int(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Timestamp(t) => write!(f, "{}", t),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<u8> for SqlValue {
    fn from(v: u8) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_option_maps_none_to_null() {
        let none: Option<String> = None;
        assert_eq!(SqlValue::from(none), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Int(5));
    }

    #[test]
    fn test_sentinel_like_values_are_not_null() {
        assert_eq!(SqlValue::from(-1), SqlValue::Int(-1));
        assert_eq!(SqlValue::from(""), SqlValue::Text(String::new()));
        assert!(!SqlValue::from(NaiveDateTime::MIN).is_null());
    }

    #[test]
    fn test_as_i64_accepts_integral_decimal_and_text() {
        assert_eq!(SqlValue::Decimal(Decimal::from(42)).as_i64(), Some(42));
        assert_eq!(SqlValue::Text(" 17 ".into()).as_i64(), Some(17));
        let fractional = Decimal::from_str("1.5").unwrap();
        assert_eq!(SqlValue::Decimal(fractional).as_i64(), None);
        assert_eq!(SqlValue::Null.as_i64(), None);
    }

    #[test]
    fn test_as_i64_rejects_flags() {
        assert_eq!(SqlValue::Bool(true).as_i64(), None);
        assert_eq!(SqlValue::Bool(false).as_i64(), None);
    }

    #[test]
    fn test_as_bool_accepts_tinyint() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(true));
        assert_eq!(SqlValue::Int(0).as_bool(), Some(false));
        assert_eq!(SqlValue::Int(2).as_bool(), None);
    }
}
