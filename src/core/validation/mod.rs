//! Declarative validation
//!
//! Every entity publishes a static table of [`FieldRules`]. Setters check a
//! candidate value against its field's rules before committing it, and
//! `validate()` runs the whole table before anything is persisted.
//!
//! ```rust,ignore
//! const RULES: &[FieldRules] = &[
//!     FieldRules::new("Name", &[Rule::Required, Rule::Length { min: 1, max: 100 }]),
//!     FieldRules::new("Price", &[Rule::Positive]),
//! ];
//! ```

pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::field::{FieldFormat, FieldValue};

/// A single declarative constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Length { min: usize, max: usize },
    MaxLength(usize),
    Positive,
    NonNegative,
    Format(FieldFormat),
}

impl Rule {
    pub fn check(&self, field: &str, value: &FieldValue) -> Result<(), String> {
        match *self {
            Rule::Required => validators::required(field, value),
            Rule::Length { min, max } => validators::string_length(field, value, min, max),
            Rule::MaxLength(max) => validators::string_length(field, value, 0, max),
            Rule::Positive => validators::positive(field, value),
            Rule::NonNegative => validators::non_negative(field, value),
            Rule::Format(format) => validators::format(field, value, format),
        }
    }
}

/// The rules attached to one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl FieldRules {
    pub const fn new(field: &'static str, rules: &'static [Rule]) -> Self {
        Self { field, rules }
    }
}

/// Look up the rules of `field` in a table
pub fn rules_for(table: &'static [FieldRules], field: &str) -> &'static [Rule] {
    table
        .iter()
        .find(|r| r.field == field)
        .map(|r| r.rules)
        .unwrap_or(&[])
}

/// Check one value against every rule of its field.
///
/// Fails on the first violated rule; this is the check a setter runs.
pub fn validate_field(
    table: &'static [FieldRules],
    field: &str,
    value: &FieldValue,
) -> Result<(), ValidationError> {
    for rule in rules_for(table, field) {
        rule.check(field, value)
            .map_err(|message| ValidationError::FieldError {
                field: field.to_string(),
                message,
            })?;
    }
    Ok(())
}

/// Check every field of a table, collecting all violations.
///
/// `value_of` supplies the current value of a field by name.
pub fn validate_all<F>(table: &'static [FieldRules], value_of: F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> FieldValue,
{
    let mut errors = Vec::new();

    for entry in table {
        let value = value_of(entry.field);
        for rule in entry.rules {
            if let Err(message) = rule.check(entry.field, &value) {
                errors.push(FieldValidationError {
                    field: entry.field.to_string(),
                    message,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::FieldErrors(errors))
    }
}
