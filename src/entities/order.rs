//! Order entity and its delivery lifecycle
//!
//! ```text
//! Shipping ──▶ Arrived ──▶ Delivered
//!     │           │
//!     └───────────┴──▶ Cancelled
//! ```
//!
//! Status only changes through the transition operations; `save` never
//! writes it after the initial add.

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign, records};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::FieldValue;
use crate::core::lifecycle::Lifecycle;
use crate::core::validation::{FieldRules, Rule, validate_field};
use crate::data::orders::{
    self, CUSTOMER_ID, ORDER_DATE, ORDER_ID, PRODUCT_ID, QUANTITY, SHIPPING_ID, STATUS,
    TOTAL_AMOUNT,
};
use crate::entities::{Customer, Product, Shipping};
use crate::gateway::{Call, Procedure, Row, Table};
use crate::store::Store;
use chrono::{NaiveDateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderStatus {
    Shipping = 1,
    Arrived = 2,
    Delivered = 3,
    Cancelled = 4,
}

crate::status_codes!(OrderStatus {
    Shipping = 1 => "Shipping",
    Arrived = 2 => "Arrived",
    Delivered = 3 => "Delivered",
    Cancelled = 4 => "Cancelled",
});

impl Lifecycle for OrderStatus {
    const ENTITY_TYPE: &'static str = "order";

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Shipping => &[Self::Arrived, Self::Cancelled],
            Self::Arrived => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: i32,
    customer_id: i32,
    product_id: i32,
    quantity: i32,
    total_amount: Decimal,
    order_date: NaiveDateTime,
    status: OrderStatus,
    shipping_id: Option<i32>,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            customer_id: 0,
            product_id: 0,
            quantity: 0,
            total_amount: Decimal::ZERO,
            order_date: Utc::now().naive_utc(),
            status: OrderStatus::Shipping,
            shipping_id: None,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Order {
    /// A new order dated now, in the `Shipping` status
    pub fn new(customer_id: i32, product_id: i32, quantity: i32, total_amount: Decimal) -> Self {
        Self {
            customer_id,
            product_id,
            quantity,
            total_amount,
            ..Self::default()
        }
    }

    /// A new order priced from the product's current price
    pub fn for_product(customer: &Customer, product: &Product, quantity: i32) -> Self {
        Self::new(
            customer.id(),
            product.id(),
            quantity,
            product.price() * Decimal::from(quantity),
        )
    }

    pub fn customer_id(&self) -> i32 {
        self.customer_id
    }

    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn order_date(&self) -> NaiveDateTime {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn shipping_id(&self) -> Option<i32> {
        self.shipping_id
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

    pub fn set_product_id(&mut self, value: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.product_id,
            value,
            Self::RULES,
            PRODUCT_ID,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_quantity(&mut self, value: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.quantity,
            value,
            Self::RULES,
            QUANTITY,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_total_amount(&mut self, value: Decimal) -> Result<(), ValidationError> {
        assign(
            &mut self.total_amount,
            value,
            Self::RULES,
            TOTAL_AMOUNT,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_order_date(&mut self, value: NaiveDateTime) -> Result<(), ValidationError> {
        assign(
            &mut self.order_date,
            value,
            Self::RULES,
            ORDER_DATE,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn mark_as_arrived(&mut self, store: &Store) -> StoreResult<bool> {
        self.transition(store, OrderStatus::Arrived, &orders::MARK_AS_ARRIVED).await
    }

    pub async fn change_to_delivered(&mut self, store: &Store) -> StoreResult<bool> {
        self.transition(store, OrderStatus::Delivered, &orders::CHANGE_TO_DELIVERED).await
    }

    pub async fn cancel(&mut self, store: &Store) -> StoreResult<bool> {
        self.transition(store, OrderStatus::Cancelled, &orders::CANCEL).await
    }

    /// Deliver several orders concurrently.
    ///
    /// Returns one outcome per order, in input order. An order whose
    /// transition is illegal fails on its own without affecting the rest.
    pub async fn change_many_to_delivered(
        store: &Store,
        orders: &mut [Order],
    ) -> Vec<StoreResult<bool>> {
        join_all(orders.iter_mut().map(|order| order.change_to_delivered(store))).await
    }

    async fn transition(
        &mut self,
        store: &Store,
        target: OrderStatus,
        procedure: &'static Procedure,
    ) -> StoreResult<bool> {
        self.status.check_transition(target)?;
        let call = orders::by_id(procedure, self.id)?;
        let changed = store
            .change_status::<Self>(self.id, self.status, target, call)
            .await?;
        if changed {
            self.status = target;
        }
        Ok(changed)
    }

    /// Attach a shipment to this order. The shipment must already be saved.
    pub async fn assign_shipping(
        &mut self,
        store: &Store,
        shipping: &Shipping,
    ) -> StoreResult<bool> {
        let candidate = Some(shipping.id());
        validate_field(Self::RULES, SHIPPING_ID, &candidate.into())?;

        let call = orders::assign_shipping(self.id, shipping.id())?;
        let assigned = store.apply::<Self>(call).await?;
        if assigned {
            tracing::info!(
                order_id = self.id,
                shipping_id = shipping.id(),
                "shipping assigned to order"
            );
            self.shipping_id = candidate;
        }
        Ok(assigned)
    }

    pub async fn customer(&self, store: &Store) -> StoreResult<Option<Customer>> {
        Customer::find(store, self.customer_id).await
    }

    pub async fn product(&self, store: &Store) -> StoreResult<Option<Product>> {
        Product::find(store, self.product_id).await
    }

    /// The attached shipment, if one has been assigned
    pub async fn shipping(&self, store: &Store) -> StoreResult<Option<Shipping>> {
        match self.shipping_id {
            Some(id) => Shipping::find(store, id).await,
            None => Ok(None),
        }
    }

    pub async fn find(store: &Store, order_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(orders::by_id(&orders::GET_BY_ID, order_id)?).await
    }

    /// Cached listing of every order
    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store.listing::<Self>(orders::GET_ALL.call().finish()?).await
    }

    pub async fn get_all(store: &Store) -> StoreResult<Vec<Self>> {
        let table = Self::get_table(store).await?;
        Ok(records(&table)?)
    }

    pub async fn get_by_customer(store: &Store, customer_id: i32) -> StoreResult<Vec<Self>> {
        store.find_many(orders::by_customer(customer_id)?).await
    }

    pub async fn get_by_status(store: &Store, status: OrderStatus) -> StoreResult<Vec<Self>> {
        store.find_many(orders::by_status(status)?).await
    }
}

impl Entity for Order {
    const ENTITY_TYPE: &'static str = "order";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(CUSTOMER_ID, &[Rule::Positive]),
        FieldRules::new(PRODUCT_ID, &[Rule::Positive]),
        FieldRules::new(QUANTITY, &[Rule::Positive]),
        FieldRules::new(TOTAL_AMOUNT, &[Rule::NonNegative]),
        FieldRules::new(SHIPPING_ID, &[Rule::Positive]),
    ];

    const CACHE_KEY: Option<&'static str> = Some(Self::ENTITY_TYPE);

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            ORDER_ID => self.id.into(),
            CUSTOMER_ID => self.customer_id.into(),
            PRODUCT_ID => self.product_id.into(),
            QUANTITY => self.quantity.into(),
            TOTAL_AMOUNT => self.total_amount.into(),
            ORDER_DATE => self.order_date.into(),
            STATUS => i64::from(self.status.code()).into(),
            SHIPPING_ID => self.shipping_id.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        let code = row.get_u8(STATUS)?;
        let status = OrderStatus::from_code(code).ok_or_else(|| GatewayError::UnknownCode {
            column: STATUS.to_string(),
            entity: "order status",
            code: i64::from(code),
        })?;

        Ok(Self {
            id: row.get_i32(ORDER_ID)?,
            customer_id: row.get_i32(CUSTOMER_ID)?,
            product_id: row.get_i32(PRODUCT_ID)?,
            quantity: row.get_i32(QUANTITY)?,
            total_amount: row.get_decimal(TOTAL_AMOUNT)?,
            order_date: row.get_timestamp(ORDER_DATE)?,
            status,
            shipping_id: row.get_opt_i32(SHIPPING_ID)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        orders::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        orders::update_call(self)
    }
}
