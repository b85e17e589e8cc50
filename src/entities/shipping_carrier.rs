//! Shipping carrier entity

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, nullable_text, records};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::validation::{FieldRules, Rule};
use crate::data::shipping_carriers::{self, CARRIER_ID, IS_ACTIVE, NAME, PHONE, WEBSITE};
use crate::gateway::{Call, Row, Table};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingCarrier {
    id: i32,
    name: String,
    phone: String,
    website: Option<String>,
    is_active: bool,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for ShippingCarrier {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            name: String::new(),
            phone: String::new(),
            website: None,
            is_active: true,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl ShippingCarrier {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, website: Option<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            website: nullable_text(website),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.name,
            value.into(),
            Self::RULES,
            NAME,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_phone(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.phone,
            value.into(),
            Self::RULES,
            PHONE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_website(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.website,
            nullable_text(value),
            Self::RULES,
            WEBSITE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    /// Takes effect on the next save
    pub fn set_active(&mut self, value: bool) -> Result<(), ValidationError> {
        assign(
            &mut self.is_active,
            value,
            Self::RULES,
            IS_ACTIVE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn delete(&self, store: &Store) -> StoreResult<bool> {
        store
            .delete(self, shipping_carriers::by_id(&shipping_carriers::DELETE, self.id)?)
            .await
    }

    pub async fn find(store: &Store, carrier_id: i32) -> StoreResult<Option<Self>> {
        store
            .find_one(shipping_carriers::by_id(&shipping_carriers::GET_BY_ID, carrier_id)?)
            .await
    }

    /// Cached listing of every carrier
    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store
            .listing::<Self>(shipping_carriers::GET_ALL.call().finish()?)
            .await
    }

    pub async fn get_all(store: &Store) -> StoreResult<Vec<Self>> {
        let table = Self::get_table(store).await?;
        Ok(records(&table)?)
    }
}

impl Entity for ShippingCarrier {
    const ENTITY_TYPE: &'static str = "shipping_carrier";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(NAME, &[Rule::Required, Rule::Length { min: 1, max: 100 }]),
        FieldRules::new(PHONE, &[Rule::Required, Rule::Format(FieldFormat::Phone)]),
        FieldRules::new(WEBSITE, &[Rule::Format(FieldFormat::Url)]),
    ];

    const CACHE_KEY: Option<&'static str> = Some(Self::ENTITY_TYPE);

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            CARRIER_ID => self.id.into(),
            NAME => self.name.as_str().into(),
            PHONE => self.phone.as_str().into(),
            WEBSITE => self.website.as_deref().into(),
            IS_ACTIVE => self.is_active.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        Ok(Self {
            id: row.get_i32(CARRIER_ID)?,
            name: row.get_string(NAME)?,
            phone: row.get_string(PHONE)?,
            website: row.get_opt_string(WEBSITE)?,
            is_active: row.get_bool(IS_ACTIVE)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        shipping_carriers::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        shipping_carriers::update_call(self)
    }
}
