//! Product entity

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, nullable_text};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::FieldValue;
use crate::core::validation::{FieldRules, Rule};
use crate::data::products::{self, DESCRIPTION, IS_AVAILABLE, NAME, PRICE, PRODUCT_ID, QUANTITY};
use crate::gateway::{Call, Row, Table};
use crate::store::Store;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    quantity: i32,
    is_available: bool,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            name: String::new(),
            description: None,
            price: Decimal::ZERO,
            quantity: 0,
            is_available: false,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Product {
    /// A new, unsaved product. Nothing is validated until `save`.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
        quantity: i32,
        is_available: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: nullable_text(description),
            price,
            quantity,
            is_available,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    /// Publish property changes on `bus`
    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.name,
            name.into(),
            Self::RULES,
            NAME,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    /// Blank descriptions are stored as NULL
    pub fn set_description(&mut self, description: Option<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.description,
            nullable_text(description),
            Self::RULES,
            DESCRIPTION,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<(), ValidationError> {
        assign(
            &mut self.price,
            price,
            Self::RULES,
            PRICE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_quantity(&mut self, quantity: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.quantity,
            quantity,
            Self::RULES,
            QUANTITY,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_available(&mut self, is_available: bool) -> Result<(), ValidationError> {
        assign(
            &mut self.is_available,
            is_available,
            Self::RULES,
            IS_AVAILABLE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn delete(&self, store: &Store) -> StoreResult<bool> {
        store.delete(self, products::by_id(&products::DELETE, self.id)?).await
    }

    /// Mark the product available. The call carries only the product id.
    pub async fn make_available(&mut self, store: &Store) -> StoreResult<bool> {
        self.set_availability(store, true).await
    }

    pub async fn make_unavailable(&mut self, store: &Store) -> StoreResult<bool> {
        self.set_availability(store, false).await
    }

    async fn set_availability(&mut self, store: &Store, available: bool) -> StoreResult<bool> {
        let procedure = if available {
            &products::MAKE_AVAILABLE
        } else {
            &products::MAKE_UNAVAILABLE
        };
        let call = products::by_id(procedure, self.id)?;
        let changed = store
            .change_status::<Self>(
                self.id,
                availability(self.is_available),
                availability(available),
                call,
            )
            .await?;
        if changed {
            self.is_available = available;
        }
        Ok(changed)
    }

    pub async fn find(store: &Store, product_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(products::by_id(&products::GET_BY_ID, product_id)?).await
    }

    /// Every product as a raw table
    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store.listing::<Self>(products::GET_ALL.call().finish()?).await
    }

    pub async fn get_available(store: &Store) -> StoreResult<Vec<Self>> {
        store.find_many(products::GET_AVAILABLE.call().finish()?).await
    }
}

fn availability(available: bool) -> &'static str {
    if available { "available" } else { "unavailable" }
}

impl Entity for Product {
    const ENTITY_TYPE: &'static str = "product";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(NAME, &[Rule::Required, Rule::Length { min: 1, max: 100 }]),
        FieldRules::new(DESCRIPTION, &[Rule::MaxLength(500)]),
        FieldRules::new(PRICE, &[Rule::Positive]),
        FieldRules::new(QUANTITY, &[Rule::NonNegative]),
    ];

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            PRODUCT_ID => self.id.into(),
            NAME => self.name.as_str().into(),
            DESCRIPTION => self.description.as_deref().into(),
            PRICE => self.price.into(),
            QUANTITY => self.quantity.into(),
            IS_AVAILABLE => self.is_available.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        Ok(Self {
            id: row.get_i32(PRODUCT_ID)?,
            name: row.get_string(NAME)?,
            description: row.get_opt_string(DESCRIPTION)?,
            price: row.get_decimal(PRICE)?,
            quantity: row.get_i32(QUANTITY)?,
            is_available: row.get_bool(IS_AVAILABLE)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        products::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        products::update_call(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_new_product_is_unsaved() {
        let product = Product::new("Widget", None, dec("9.99"), 0, false);
        assert_eq!(product.id(), UNSAVED_ID);
        assert_eq!(product.mode(), Mode::AddNew);
        assert!(product.is_new());
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let product = Product::new("  ", None, Decimal::ZERO, -1, true);
        let err = product.validate().unwrap_err();
        assert!(err.mentions(NAME));
        assert!(err.mentions(PRICE));
        assert!(err.mentions(QUANTITY));
        assert!(!err.mentions(DESCRIPTION));
    }

    #[test]
    fn test_rejected_setter_leaves_value() {
        let mut product = Product::new("Widget", None, dec("9.99"), 0, false);
        assert!(product.set_price(dec("-1")).is_err());
        assert_eq!(product.price(), dec("9.99"));
        assert!(product.set_name("x".repeat(101)).is_err());
        assert_eq!(product.name(), "Widget");
    }

    #[test]
    fn test_blank_description_is_none() {
        let mut product = Product::new("Widget", Some("   ".to_string()), dec("1"), 1, true);
        assert_eq!(product.description(), None);
        product.set_description(Some("Blue".to_string())).unwrap();
        assert_eq!(product.description(), Some("Blue"));
        product.set_description(Some(String::new())).unwrap();
        assert_eq!(product.description(), None);
    }

    #[test]
    fn test_from_row_is_in_update_mode() {
        let row = Row::new()
            .with(PRODUCT_ID, 4)
            .with(NAME, "Widget")
            .with(DESCRIPTION, None::<String>)
            .with(PRICE, dec("9.99"))
            .with(QUANTITY, 3)
            .with(IS_AVAILABLE, true);
        let product = Product::from_row(&row).unwrap();
        assert_eq!(product.id(), 4);
        assert_eq!(product.mode(), Mode::Update);
        assert_eq!(product.description(), None);
    }
}
