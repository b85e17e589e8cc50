//! Field value types and format checks

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::OnceLock;
use validator::{ValidateEmail, ValidateUrl};

/// A polymorphic view of one entity field, used by the validation rules
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view shared by integer and decimal fields
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::String(v.clone())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::DateTime(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Field format validators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Email,
    Url,
    Phone,
    /// Letters plus spaces, apostrophes, dots and hyphens
    PersonName,
    /// Carrier tracking code: 8 to 30 upper-case letters and digits
    TrackingNumber,
}

impl FieldFormat {
    /// Validate a string against this format. Non-strings never match.
    pub fn validate(&self, value: &FieldValue) -> bool {
        let Some(s) = value.as_string() else {
            return false;
        };

        match self {
            FieldFormat::Email => s.validate_email(),
            FieldFormat::Url => s.validate_url() && Self::is_web_url(s),
            FieldFormat::Phone => Self::is_valid_phone(s),
            FieldFormat::PersonName => Self::is_valid_person_name(s),
            FieldFormat::TrackingNumber => Self::is_valid_tracking_number(s),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FieldFormat::Email => "a valid email address",
            FieldFormat::Url => "an http(s) URL",
            FieldFormat::Phone => "a phone number of 8 to 15 digits",
            FieldFormat::PersonName => "letters, spaces, apostrophes, dots or hyphens",
            FieldFormat::TrackingNumber => "8 to 30 upper-case letters or digits",
        }
    }

    fn is_web_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());
        regex.is_match(url)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            // At least 8 digits, max 15 (E.164 standard)
            Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap()
        });
        let compact: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();
        regex.is_match(&compact)
    }

    fn is_valid_person_name(name: &str) -> bool {
        static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = NAME_REGEX.get_or_init(|| Regex::new(r"^[\p{L}][\p{L} '.\-]*$").unwrap());
        regex.is_match(name)
    }

    fn is_valid_tracking_number(code: &str) -> bool {
        static TRACKING_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TRACKING_REGEX.get_or_init(|| Regex::new(r"^[A-Z0-9]{8,30}$").unwrap());
        regex.is_match(code)
    }
}
