//! Customer website entity

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, nullable_text};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::validation::{FieldRules, Rule};
use crate::data::websites::{self, CUSTOMER_ID, DESCRIPTION, URL, WEBSITE_ID};
use crate::entities::Customer;
use crate::gateway::{Call, Row};
use crate::store::Store;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Website {
    id: i32,
    customer_id: i32,
    url: String,
    description: Option<String>,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Website {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            customer_id: 0,
            url: String::new(),
            description: None,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Website {
    pub fn new(customer_id: i32, url: impl Into<String>, description: Option<String>) -> Self {
        Self {
            customer_id,
            url: url.into(),
            description: nullable_text(description),
            ..Self::default()
        }
    }

    pub fn customer_id(&self) -> i32 {
        self.customer_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_customer_id(&mut self, value: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.customer_id,
            value,
            Self::RULES,
            CUSTOMER_ID,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_url(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.url,
            value.into(),
            Self::RULES,
            URL,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_description(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.description,
            nullable_text(value),
            Self::RULES,
            DESCRIPTION,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn delete(&self, store: &Store) -> StoreResult<bool> {
        store.delete(self, websites::by_id(&websites::DELETE, self.id)?).await
    }

    pub async fn customer(&self, store: &Store) -> StoreResult<Option<Customer>> {
        Customer::find(store, self.customer_id).await
    }

    pub async fn find(store: &Store, website_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(websites::by_id(&websites::GET_BY_ID, website_id)?).await
    }

    pub async fn get_by_customer(store: &Store, customer_id: i32) -> StoreResult<Vec<Self>> {
        store.find_many(websites::by_customer(customer_id)?).await
    }
}

impl Entity for Website {
    const ENTITY_TYPE: &'static str = "website";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(CUSTOMER_ID, &[Rule::Positive]),
        FieldRules::new(
            URL,
            &[Rule::Required, Rule::MaxLength(200), Rule::Format(FieldFormat::Url)],
        ),
        FieldRules::new(DESCRIPTION, &[Rule::MaxLength(250)]),
    ];

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            WEBSITE_ID => self.id.into(),
            CUSTOMER_ID => self.customer_id.into(),
            URL => self.url.as_str().into(),
            DESCRIPTION => self.description.as_deref().into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        Ok(Self {
            id: row.get_i32(WEBSITE_ID)?,
            customer_id: row.get_i32(CUSTOMER_ID)?,
            url: row.get_string(URL)?,
            description: row.get_opt_string(DESCRIPTION)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        websites::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        websites::update_call(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_rules() {
        let mut site = Website::new(1, "https://ada.example", None);
        assert!(site.validate().is_ok());
        assert!(site.set_url("not a url").is_err());
        assert!(site.set_url(format!("https://{}.example", "a".repeat(200))).is_err());
        assert_eq!(site.url(), "https://ada.example");
    }
}
