//! Reusable field validators
//!
//! Each validator inspects one field value and returns the violation
//! message, if any. Validators ignore value kinds they do not apply to so
//! they can be stacked freely in a rule table.

use crate::core::field::{FieldFormat, FieldValue};
use rust_decimal::Decimal;

/// Validator: field is required (not null, and not blank for strings)
pub fn required(field: &str, value: &FieldValue) -> Result<(), String> {
    match value {
        FieldValue::Null => Err(format!("{} is required", field)),
        FieldValue::String(s) if s.trim().is_empty() => Err(format!("{} is required", field)),
        _ => Ok(()),
    }
}

/// Validator: string length (in characters) must be within range
pub fn string_length(
    field: &str,
    value: &FieldValue,
    min: usize,
    max: usize,
) -> Result<(), String> {
    if let Some(s) = value.as_string() {
        let len = s.chars().count();
        if len < min {
            Err(format!(
                "{} must be at least {} characters (currently {})",
                field, min, len
            ))
        } else if len > max {
            Err(format!(
                "{} must not exceed {} characters (currently {})",
                field, max, len
            ))
        } else {
            Ok(())
        }
    } else {
        Ok(())
    }
}

/// Validator: number must be strictly positive
pub fn positive(field: &str, value: &FieldValue) -> Result<(), String> {
    match value.as_decimal() {
        Some(num) if num <= Decimal::ZERO => {
            Err(format!("{} must be positive (value: {})", field, num))
        }
        _ => Ok(()),
    }
}

/// Validator: number must be zero or more
pub fn non_negative(field: &str, value: &FieldValue) -> Result<(), String> {
    match value.as_decimal() {
        Some(num) if num < Decimal::ZERO => {
            Err(format!("{} must not be negative (value: {})", field, num))
        }
        _ => Ok(()),
    }
}

/// Validator: string must match a format. Null passes; pair with
/// [`required`] for mandatory fields.
pub fn format(field: &str, value: &FieldValue, format: FieldFormat) -> Result<(), String> {
    if value.is_null() || format.validate(value) {
        Ok(())
    } else {
        Err(format!("{} must be {}", field, format.description()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> FieldValue {
        FieldValue::String(v.to_string())
    }

    // === required() ===

    #[test]
    fn test_required_null_value_returns_error() {
        let result = required("Name", &FieldValue::Null);
        assert!(result.unwrap_err().contains("required"));
    }

    #[test]
    fn test_required_blank_string_returns_error() {
        assert!(required("Name", &s("")).is_err());
        assert!(required("Name", &s("   \t")).is_err());
    }

    #[test]
    fn test_required_values_return_ok() {
        assert!(required("Name", &s("Widget")).is_ok());
        assert!(required("Quantity", &FieldValue::Integer(0)).is_ok());
        assert!(required("IsAvailable", &FieldValue::Boolean(false)).is_ok());
    }

    // === string_length() ===

    #[test]
    fn test_string_length_bounds() {
        assert!(string_length("Name", &s(""), 1, 5).is_err());
        assert!(string_length("Name", &s("abcdef"), 1, 5)
            .unwrap_err()
            .contains("exceed 5"));
        assert!(string_length("Name", &s("abcde"), 1, 5).is_ok());
        assert!(string_length("Name", &s("a"), 1, 5).is_ok());
    }

    #[test]
    fn test_string_length_counts_characters() {
        assert!(string_length("Name", &s("Zoë"), 1, 3).is_ok());
    }

    #[test]
    fn test_string_length_non_string_passthrough() {
        assert!(string_length("Age", &FieldValue::Integer(42), 5, 10).is_ok());
        assert!(string_length("Notes", &FieldValue::Null, 1, 10).is_ok());
    }

    // === positive() / non_negative() ===

    #[test]
    fn test_positive() {
        assert!(positive("Price", &FieldValue::Decimal(Decimal::new(999, 2))).is_ok());
        assert!(positive("Price", &FieldValue::Decimal(Decimal::ZERO))
            .unwrap_err()
            .contains("positive"));
        assert!(positive("Quantity", &FieldValue::Integer(-1)).is_err());
        assert!(positive("Name", &s("hello")).is_ok());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("Quantity", &FieldValue::Integer(0)).is_ok());
        assert!(non_negative("Quantity", &FieldValue::Integer(-1)).is_err());
    }

    // === format() ===

    #[test]
    fn test_format_null_passes() {
        assert!(format("Website", &FieldValue::Null, FieldFormat::Url).is_ok());
    }

    #[test]
    fn test_format_mismatch_describes_expectation() {
        let err = format("Email", &s("nobody"), FieldFormat::Email).unwrap_err();
        assert_eq!(err, "Email must be a valid email address");
    }
}
