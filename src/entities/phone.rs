//! Customer phone number entity

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::validation::{FieldRules, Rule};
use crate::data::phones::{self, CUSTOMER_ID, IS_ACTIVE, KIND, NUMBER, PHONE_ID};
use crate::entities::Customer;
use crate::entities::customer::activity;
use crate::gateway::{Call, Row};
use crate::store::Store;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PhoneKind {
    Mobile = 1,
    Home = 2,
    Work = 3,
}

crate::status_codes!(PhoneKind {
    Mobile = 1 => "Mobile",
    Home = 2 => "Home",
    Work = 3 => "Work",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phone {
    id: i32,
    customer_id: i32,
    number: String,
    kind: PhoneKind,
    is_active: bool,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Phone {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            customer_id: 0,
            number: String::new(),
            kind: PhoneKind::Mobile,
            is_active: true,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Phone {
    pub fn new(customer_id: i32, number: impl Into<String>, kind: PhoneKind) -> Self {
        Self {
            customer_id,
            number: number.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn customer_id(&self) -> i32 {
        self.customer_id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> PhoneKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.is_active
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

    pub fn set_number(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.number,
            value.into(),
            Self::RULES,
            NUMBER,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_kind(&mut self, value: PhoneKind) {
        if self.kind != value {
            self.kind = value;
            self.notifier.property_changed(Self::ENTITY_TYPE, self.id, KIND);
        }
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn deactivate(&mut self, store: &Store) -> StoreResult<bool> {
        let call = phones::by_id(&phones::DEACTIVATE, self.id)?;
        let changed = store
            .change_status::<Self>(self.id, activity(self.is_active), activity(false), call)
            .await?;
        if changed {
            self.is_active = false;
        }
        Ok(changed)
    }

    pub async fn customer(&self, store: &Store) -> StoreResult<Option<Customer>> {
        Customer::find(store, self.customer_id).await
    }

    pub async fn find(store: &Store, phone_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(phones::by_id(&phones::GET_BY_ID, phone_id)?).await
    }

    pub async fn get_by_customer(store: &Store, customer_id: i32) -> StoreResult<Vec<Self>> {
        store.find_many(phones::by_customer(customer_id)?).await
    }
}

impl Entity for Phone {
    const ENTITY_TYPE: &'static str = "phone";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(CUSTOMER_ID, &[Rule::Positive]),
        FieldRules::new(NUMBER, &[Rule::Required, Rule::Format(FieldFormat::Phone)]),
    ];

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            PHONE_ID => self.id.into(),
            CUSTOMER_ID => self.customer_id.into(),
            NUMBER => self.number.as_str().into(),
            KIND => i64::from(self.kind.code()).into(),
            IS_ACTIVE => self.is_active.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        let code = row.get_u8(KIND)?;
        let kind = PhoneKind::from_code(code).ok_or_else(|| GatewayError::UnknownCode {
            column: KIND.to_string(),
            entity: "phone kind",
            code: i64::from(code),
        })?;

        Ok(Self {
            id: row.get_i32(PHONE_ID)?,
            customer_id: row.get_i32(CUSTOMER_ID)?,
            number: row.get_string(NUMBER)?,
            kind,
            is_active: row.get_bool(IS_ACTIVE)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        phones::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        phones::update_call(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format() {
        let mut phone = Phone::new(1, "(555) 010-2030", PhoneKind::Home);
        assert!(phone.validate().is_ok());
        assert!(phone.set_number("call me").is_err());
        assert_eq!(phone.number(), "(555) 010-2030");
    }

    #[test]
    fn test_customer_required() {
        let phone = Phone::new(0, "+15550102030", PhoneKind::Mobile);
        assert!(phone.validate().unwrap_err().mentions(CUSTOMER_ID));
    }
}
