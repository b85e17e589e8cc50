//! Customer entity
//!
//! Customers are never deleted; they are deactivated instead. The full
//! customer listing is cached with a sliding expiry.

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, nullable_text, records};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::validation::{FieldRules, Rule};
use crate::data::customers::{
    self, ADDRESS, CUSTOMER_ID, EMAIL, FIRST_NAME, IS_ACTIVE, LAST_NAME,
};
use crate::entities::{Phone, Website};
use crate::gateway::{Call, Row, Table};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    address: Option<String>,
    is_active: bool,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: None,
            is_active: true,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            address: nullable_text(address),
            ..Self::default()
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.first_name,
            value.into(),
            Self::RULES,
            FIRST_NAME,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.last_name,
            value.into(),
            Self::RULES,
            LAST_NAME,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_email(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.email,
            value.into(),
            Self::RULES,
            EMAIL,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_address(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.address,
            nullable_text(value),
            Self::RULES,
            ADDRESS,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn deactivate(&mut self, store: &Store) -> StoreResult<bool> {
        self.set_active(store, false).await
    }

    pub async fn activate(&mut self, store: &Store) -> StoreResult<bool> {
        self.set_active(store, true).await
    }

    async fn set_active(&mut self, store: &Store, active: bool) -> StoreResult<bool> {
        let call = customers::set_active(self.id, active)?;
        let changed = store
            .change_status::<Self>(self.id, activity(self.is_active), activity(active), call)
            .await?;
        if changed {
            self.is_active = active;
        }
        Ok(changed)
    }

    pub async fn find(store: &Store, customer_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(customers::by_id(&customers::GET_BY_ID, customer_id)?).await
    }

    pub async fn find_by_email(store: &Store, email: &str) -> StoreResult<Option<Self>> {
        store.find_one(customers::by_email(email)?).await
    }

    /// Cached listing of every customer
    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store.listing::<Self>(customers::GET_ALL.call().finish()?).await
    }

    pub async fn get_all(store: &Store) -> StoreResult<Vec<Self>> {
        let table = Self::get_table(store).await?;
        Ok(records(&table)?)
    }

    pub async fn phones(&self, store: &Store) -> StoreResult<Vec<Phone>> {
        Phone::get_by_customer(store, self.id).await
    }

    pub async fn websites(&self, store: &Store) -> StoreResult<Vec<Website>> {
        Website::get_by_customer(store, self.id).await
    }
}

pub(crate) fn activity(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

impl Entity for Customer {
    const ENTITY_TYPE: &'static str = "customer";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(
            FIRST_NAME,
            &[
                Rule::Required,
                Rule::Length { min: 1, max: 50 },
                Rule::Format(FieldFormat::PersonName),
            ],
        ),
        FieldRules::new(
            LAST_NAME,
            &[
                Rule::Required,
                Rule::Length { min: 1, max: 50 },
                Rule::Format(FieldFormat::PersonName),
            ],
        ),
        FieldRules::new(
            EMAIL,
            &[Rule::Required, Rule::MaxLength(100), Rule::Format(FieldFormat::Email)],
        ),
        FieldRules::new(ADDRESS, &[Rule::MaxLength(200)]),
    ];

    const CACHE_KEY: Option<&'static str> = Some(Self::ENTITY_TYPE);

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            CUSTOMER_ID => self.id.into(),
            FIRST_NAME => self.first_name.as_str().into(),
            LAST_NAME => self.last_name.as_str().into(),
            EMAIL => self.email.as_str().into(),
            ADDRESS => self.address.as_deref().into(),
            IS_ACTIVE => self.is_active.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        Ok(Self {
            id: row.get_i32(CUSTOMER_ID)?,
            first_name: row.get_string(FIRST_NAME)?,
            last_name: row.get_string(LAST_NAME)?,
            email: row.get_string(EMAIL)?,
            address: row.get_opt_string(ADDRESS)?,
            is_active: row.get_bool(IS_ACTIVE)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        customers::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        customers::update_call(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_is_active_and_unsaved() {
        let customer = Customer::new("Ada", "Lovelace", "ada@example.com", None);
        assert!(customer.is_active());
        assert!(customer.is_new());
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_name_format() {
        let mut customer = Customer::new("Ada", "Lovelace", "ada@example.com", None);
        assert!(customer.set_last_name("O'Brien-Smith").is_ok());
        assert!(customer.set_first_name("R2D2").is_err());
        assert_eq!(customer.first_name(), "Ada");
    }

    #[test]
    fn test_email_rules() {
        let mut customer = Customer::new("Ada", "Lovelace", "ada@example.com", None);
        assert!(customer.set_email("not-an-email").is_err());
        assert!(customer.set_email("").is_err());
        assert_eq!(customer.email(), "ada@example.com");
    }

    #[test]
    fn test_validate_reports_both_names() {
        let customer = Customer::new("", " ", "ada@example.com", Some("x".repeat(201)));
        let err = customer.validate().unwrap_err();
        assert!(err.mentions(FIRST_NAME));
        assert!(err.mentions(LAST_NAME));
        assert!(err.mentions(ADDRESS));
        assert!(!err.mentions(EMAIL));
    }
}
