//! Entity trait defining the lifecycle every business object shares

use crate::core::error::{GatewayError, ValidationError};
use crate::core::events::Notifier;
use crate::core::field::FieldValue;
use crate::core::validation::{FieldRules, validate_all, validate_field};
use crate::gateway::{Call, Row, Table};
use serde::{Deserialize, Serialize};

/// Identifier carried by an entity that has never been saved
pub const UNSAVED_ID: i32 = -1;

/// Whether the next save adds a new row or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    AddNew,
    Update,
}

/// Base trait for all business objects.
///
/// An entity is one validated row. It starts in [`Mode::AddNew`] with
/// [`UNSAVED_ID`]; a successful add assigns the database identifier and
/// flips it to [`Mode::Update`].
///
/// Implementors describe how they map onto the database (rule table, row
/// mapping, add/update calls); the generic save, find and listing logic
/// lives on [`crate::Store`].
pub trait Entity: Sized + Send + Sync {
    /// Entity type name used in events, logs and cache keys (e.g. "product")
    const ENTITY_TYPE: &'static str;

    /// Declarative per-field rules
    const RULES: &'static [FieldRules];

    /// Listing cache slot, for entity types whose full listing is cached
    const CACHE_KEY: Option<&'static str> = None;

    fn id(&self) -> i32;

    fn mode(&self) -> Mode;

    /// Current value of a field, by the field's column name
    fn field_value(&self, field: &str) -> FieldValue;

    /// Build an entity from a row, looking columns up by name.
    /// The result is always in [`Mode::Update`].
    fn from_row(row: &Row) -> Result<Self, GatewayError>;

    /// The bound add procedure for this entity
    fn add_call(&self) -> Result<Call, GatewayError>;

    /// The bound update procedure for this entity
    fn update_call(&self) -> Result<Call, GatewayError>;

    /// Record the identifier assigned by a successful add
    fn mark_persisted(&mut self, id: i32);

    /// Validate every field against [`Entity::RULES`], collecting all
    /// violations
    fn validate(&self) -> Result<(), ValidationError> {
        validate_all(Self::RULES, |field| self.field_value(field))
    }

    fn is_new(&self) -> bool {
        self.mode() == Mode::AddNew
    }
}

/// Map the first row of a table, if any
pub fn first_record<T: Entity>(table: &Table) -> Result<Option<T>, GatewayError> {
    table.first().map(T::from_row).transpose()
}

/// Map every row of a table
pub fn records<T: Entity>(table: &Table) -> Result<Vec<T>, GatewayError> {
    table.iter().map(T::from_row).collect()
}

/// Commit a candidate value to a field.
///
/// Unchanged values are a no-op. Otherwise the candidate is validated
/// against the field's rules first; only a valid value is stored and
/// announced, so a rejected set leaves the entity untouched.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assign<V>(
    slot: &mut V,
    candidate: V,
    rules: &'static [FieldRules],
    field: &'static str,
    entity_type: &'static str,
    entity_id: i32,
    notifier: &Notifier,
) -> Result<(), ValidationError>
where
    V: PartialEq + Clone + Into<FieldValue>,
{
    if *slot == candidate {
        return Ok(());
    }
    validate_field(rules, field, &candidate.clone().into())?;
    *slot = candidate;
    notifier.property_changed(entity_type, entity_id, field);
    Ok(())
}

/// Optional free text is stored as NULL when blank
pub(crate) fn nullable_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventBus;
    use crate::core::validation::Rule;

    const RULES: &[FieldRules] = &[FieldRules::new(
        "Name",
        &[Rule::Required, Rule::Length { min: 1, max: 5 }],
    )];

    #[test]
    fn test_assign_rejects_without_mutating() {
        let mut name = "Old".to_string();
        let result = assign(
            &mut name,
            "far too long".to_string(),
            RULES,
            "Name",
            "test",
            UNSAVED_ID,
            &Notifier::default(),
        );
        assert!(result.is_err());
        assert_eq!(name, "Old");
    }

    #[tokio::test]
    async fn test_assign_notifies_only_on_change() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let mut notifier = Notifier::default();
        notifier.attach(&bus);

        let mut name = "Old".to_string();
        assign(&mut name, "Old".to_string(), RULES, "Name", "test", 1, &notifier).unwrap();
        assert!(rx.try_recv().is_err());

        assign(&mut name, "New".to_string(), RULES, "Name", "test", 1, &notifier).unwrap();
        assert_eq!(name, "New");
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event.property(), Some("Name"));
        assert_eq!(envelope.event.entity_id(), 1);
    }

    #[test]
    fn test_nullable_text() {
        assert_eq!(nullable_text(Some("  ".to_string())), None);
        assert_eq!(nullable_text(Some(String::new())), None);
        assert_eq!(nullable_text(Some("gift".to_string())), Some("gift".to_string()));
        assert_eq!(nullable_text(None), None);
    }

    #[test]
    fn test_default_mode_is_add_new() {
        assert_eq!(Mode::default(), Mode::AddNew);
    }
}
