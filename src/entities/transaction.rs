//! Payment transaction entity

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, nullable_text, records};
use crate::core::error::{GatewayError, StoreResult, TransitionError, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::FieldValue;
use crate::core::validation::{FieldRules, Rule};
use crate::data::transactions::{
    self, AMOUNT, IS_DONE, NOTES, ORDER_ID, PAYMENT_METHOD, TRANSACTION_DATE, TRANSACTION_ID,
};
use crate::entities::Order;
use crate::gateway::{Call, Row, Table};
use crate::store::Store;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PaymentMethod {
    CreditCard = 1,
    DebitCard = 2,
    PayPal = 3,
    BankTransfer = 4,
    Cash = 5,
}

crate::status_codes!(PaymentMethod {
    CreditCard = 1 => "Credit card",
    DebitCard = 2 => "Debit card",
    PayPal = 3 => "PayPal",
    BankTransfer = 4 => "Bank transfer",
    Cash = 5 => "Cash",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: i32,
    order_id: i32,
    amount: Decimal,
    payment_method: PaymentMethod,
    transaction_date: NaiveDateTime,
    is_done: bool,
    notes: Option<String>,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            order_id: 0,
            amount: Decimal::ZERO,
            payment_method: PaymentMethod::CreditCard,
            transaction_date: Utc::now().naive_utc(),
            is_done: false,
            notes: None,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Transaction {
    /// A new pending transaction dated now. Blank notes become `None`.
    pub fn new(
        order_id: i32,
        amount: Decimal,
        payment_method: PaymentMethod,
        notes: Option<String>,
    ) -> Self {
        Self {
            order_id,
            amount,
            payment_method,
            notes: nullable_text(notes),
            ..Self::default()
        }
    }

    pub fn order_id(&self) -> i32 {
        self.order_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn transaction_date(&self) -> NaiveDateTime {
        self.transaction_date
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_order_id(&mut self, value: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.order_id,
            value,
            Self::RULES,
            ORDER_ID,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_amount(&mut self, value: Decimal) -> Result<(), ValidationError> {
        assign(
            &mut self.amount,
            value,
            Self::RULES,
            AMOUNT,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_payment_method(&mut self, value: PaymentMethod) {
        if self.payment_method != value {
            self.payment_method = value;
            self.notifier.property_changed(Self::ENTITY_TYPE, self.id, PAYMENT_METHOD);
        }
    }

    pub fn set_transaction_date(&mut self, value: NaiveDateTime) -> Result<(), ValidationError> {
        assign(
            &mut self.transaction_date,
            value,
            Self::RULES,
            TRANSACTION_DATE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    /// Empty or whitespace-only notes are stored as NULL
    pub fn set_notes(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.notes,
            nullable_text(value),
            Self::RULES,
            NOTES,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    /// Settle the transaction. Done is final.
    pub async fn flag_as_done(&mut self, store: &Store) -> StoreResult<bool> {
        if self.is_done {
            return Err(TransitionError {
                entity_type: Self::ENTITY_TYPE,
                from: "done".to_string(),
                to: "done".to_string(),
            }
            .into());
        }
        let call = transactions::by_id(&transactions::FLAG_AS_DONE, self.id)?;
        let changed = store
            .change_status::<Self>(self.id, "pending", "done", call)
            .await?;
        if changed {
            self.is_done = true;
        }
        Ok(changed)
    }

    pub async fn order(&self, store: &Store) -> StoreResult<Option<Order>> {
        Order::find(store, self.order_id).await
    }

    pub async fn find(store: &Store, transaction_id: i32) -> StoreResult<Option<Self>> {
        store
            .find_one(transactions::by_id(&transactions::GET_BY_ID, transaction_id)?)
            .await
    }

    /// Cached listing of every transaction
    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store
            .listing::<Self>(transactions::GET_ALL.call().finish()?)
            .await
    }

    pub async fn get_all(store: &Store) -> StoreResult<Vec<Self>> {
        let table = Self::get_table(store).await?;
        Ok(records(&table)?)
    }

    pub async fn get_by_order(store: &Store, order_id: i32) -> StoreResult<Vec<Self>> {
        store.find_many(transactions::by_order(order_id)?).await
    }
}

impl Entity for Transaction {
    const ENTITY_TYPE: &'static str = "transaction";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(ORDER_ID, &[Rule::Positive]),
        FieldRules::new(AMOUNT, &[Rule::Positive]),
        FieldRules::new(NOTES, &[Rule::MaxLength(250)]),
    ];

    const CACHE_KEY: Option<&'static str> = Some(Self::ENTITY_TYPE);

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            TRANSACTION_ID => self.id.into(),
            ORDER_ID => self.order_id.into(),
            AMOUNT => self.amount.into(),
            PAYMENT_METHOD => i64::from(self.payment_method.code()).into(),
            TRANSACTION_DATE => self.transaction_date.into(),
            IS_DONE => self.is_done.into(),
            NOTES => self.notes.as_deref().into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        let code = row.get_u8(PAYMENT_METHOD)?;
        let payment_method =
            PaymentMethod::from_code(code).ok_or_else(|| GatewayError::UnknownCode {
                column: PAYMENT_METHOD.to_string(),
                entity: "payment method",
                code: i64::from(code),
            })?;

        Ok(Self {
            id: row.get_i32(TRANSACTION_ID)?,
            order_id: row.get_i32(ORDER_ID)?,
            amount: row.get_decimal(AMOUNT)?,
            payment_method,
            transaction_date: row.get_timestamp(TRANSACTION_DATE)?,
            is_done: row.get_bool(IS_DONE)?,
            notes: row.get_opt_string(NOTES)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        transactions::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        transactions::update_call(self)
    }
}
