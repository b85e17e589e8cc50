//! Shipment entity and its lifecycle
//!
//! ```text
//! Pending ──▶ InTransit ──▶ Arrived
//!    │  ▲         │
//!    │  └─────────┼──────── reinstate
//!    ▼            ▼
//!    Cancelled ◀──┘
//! ```
//!
//! A pending shipment may also arrive directly. Arrival is final; a
//! cancelled shipment can only be reinstated to `Pending`.

use crate::core::entity::{Entity, Mode, UNSAVED_ID, assign};
use crate::core::error::{GatewayError, StoreResult, ValidationError};
use crate::core::events::{EventBus, Notifier};
use crate::core::field::{FieldFormat, FieldValue};
use crate::core::lifecycle::Lifecycle;
use crate::core::validation::{FieldRules, Rule};
use crate::data::shipping::{
    self, CARRIER_ID, DELIVERED_AT, ESTIMATED_DELIVERY, SHIPPING_ID, STATUS, TRACKING_NUMBER,
};
use crate::entities::ShippingCarrier;
use crate::gateway::{Call, Row, Table};
use crate::store::Store;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShippingStatus {
    Pending = 1,
    InTransit = 2,
    Arrived = 3,
    Cancelled = 4,
}

crate::status_codes!(ShippingStatus {
    Pending = 1 => "Pending",
    InTransit = 2 => "InTransit",
    Arrived = 3 => "Arrived",
    Cancelled = 4 => "Cancelled",
});

impl Lifecycle for ShippingStatus {
    const ENTITY_TYPE: &'static str = "shipping";

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InTransit, Self::Arrived, Self::Cancelled],
            Self::InTransit => &[Self::Arrived, Self::Cancelled],
            Self::Arrived => &[],
            Self::Cancelled => &[Self::Pending],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipping {
    id: i32,
    carrier_id: i32,
    tracking_number: String,
    status: ShippingStatus,
    estimated_delivery: NaiveDateTime,
    delivered_at: Option<NaiveDateTime>,
    #[serde(default)]
    mode: Mode,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Shipping {
    fn default() -> Self {
        Self {
            id: UNSAVED_ID,
            carrier_id: 0,
            tracking_number: String::new(),
            status: ShippingStatus::Pending,
            estimated_delivery: Utc::now().naive_utc(),
            delivered_at: None,
            mode: Mode::AddNew,
            notifier: Notifier::default(),
        }
    }
}

impl Shipping {
    /// A new pending shipment
    pub fn new(
        carrier_id: i32,
        tracking_number: impl Into<String>,
        estimated_delivery: NaiveDateTime,
    ) -> Self {
        Self {
            carrier_id,
            tracking_number: tracking_number.into(),
            estimated_delivery,
            ..Self::default()
        }
    }

    pub fn carrier_id(&self) -> i32 {
        self.carrier_id
    }

    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    pub fn status(&self) -> ShippingStatus {
        self.status
    }

    pub fn estimated_delivery(&self) -> NaiveDateTime {
        self.estimated_delivery
    }

    pub fn delivered_at(&self) -> Option<NaiveDateTime> {
        self.delivered_at
    }

    pub fn watch(&mut self, bus: &EventBus) {
        self.notifier.attach(bus);
    }

    pub fn set_carrier_id(&mut self, value: i32) -> Result<(), ValidationError> {
        assign(
            &mut self.carrier_id,
            value,
            Self::RULES,
            CARRIER_ID,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_tracking_number(&mut self, value: impl Into<String>) -> Result<(), ValidationError> {
        assign(
            &mut self.tracking_number,
            value.into(),
            Self::RULES,
            TRACKING_NUMBER,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub fn set_estimated_delivery(&mut self, value: NaiveDateTime) -> Result<(), ValidationError> {
        assign(
            &mut self.estimated_delivery,
            value,
            Self::RULES,
            ESTIMATED_DELIVERY,
            Self::ENTITY_TYPE,
            self.id,
            &self.notifier,
        )
    }

    pub async fn save(&mut self, store: &Store) -> StoreResult<bool> {
        store.save(self).await
    }

    pub async fn mark_in_transit(&mut self, store: &Store) -> StoreResult<bool> {
        self.status.check_transition(ShippingStatus::InTransit)?;
        let call = shipping::by_id(&shipping::MARK_IN_TRANSIT, self.id)?;
        self.apply_status(store, ShippingStatus::InTransit, call).await
    }

    /// Record arrival now
    pub async fn mark_as_arrived(&mut self, store: &Store) -> StoreResult<bool> {
        self.status.check_transition(ShippingStatus::Arrived)?;
        let delivered_at = Utc::now().naive_utc();
        let call = shipping::mark_as_arrived(self.id, delivered_at)?;
        let changed = self.apply_status(store, ShippingStatus::Arrived, call).await?;
        if changed {
            self.delivered_at = Some(delivered_at);
        }
        Ok(changed)
    }

    pub async fn cancel(&mut self, store: &Store) -> StoreResult<bool> {
        self.status.check_transition(ShippingStatus::Cancelled)?;
        let call = shipping::by_id(&shipping::CANCEL, self.id)?;
        self.apply_status(store, ShippingStatus::Cancelled, call).await
    }

    /// Return a cancelled shipment to `Pending`
    pub async fn reinstate(&mut self, store: &Store) -> StoreResult<bool> {
        self.status.check_transition(ShippingStatus::Pending)?;
        let call = shipping::by_id(&shipping::REINSTATE, self.id)?;
        self.apply_status(store, ShippingStatus::Pending, call).await
    }

    async fn apply_status(
        &mut self,
        store: &Store,
        target: ShippingStatus,
        call: Call,
    ) -> StoreResult<bool> {
        let changed = store
            .change_status::<Self>(self.id, self.status, target, call)
            .await?;
        if changed {
            self.status = target;
        }
        Ok(changed)
    }

    pub async fn carrier(&self, store: &Store) -> StoreResult<Option<ShippingCarrier>> {
        ShippingCarrier::find(store, self.carrier_id).await
    }

    pub async fn find(store: &Store, shipping_id: i32) -> StoreResult<Option<Self>> {
        store.find_one(shipping::by_id(&shipping::GET_BY_ID, shipping_id)?).await
    }

    pub async fn find_by_tracking_number(
        store: &Store,
        tracking_number: &str,
    ) -> StoreResult<Option<Self>> {
        store.find_one(shipping::by_tracking_number(tracking_number)?).await
    }

    pub async fn get_table(store: &Store) -> StoreResult<Arc<Table>> {
        store.listing::<Self>(shipping::GET_ALL.call().finish()?).await
    }

    pub async fn get_by_status(store: &Store, status: ShippingStatus) -> StoreResult<Vec<Self>> {
        store.find_many(shipping::by_status(status)?).await
    }
}

impl Entity for Shipping {
    const ENTITY_TYPE: &'static str = "shipping";

    const RULES: &'static [FieldRules] = &[
        FieldRules::new(CARRIER_ID, &[Rule::Positive]),
        FieldRules::new(
            TRACKING_NUMBER,
            &[Rule::Required, Rule::Format(FieldFormat::TrackingNumber)],
        ),
    ];

    crate::entity_lifecycle!();

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            SHIPPING_ID => self.id.into(),
            CARRIER_ID => self.carrier_id.into(),
            TRACKING_NUMBER => self.tracking_number.as_str().into(),
            STATUS => i64::from(self.status.code()).into(),
            ESTIMATED_DELIVERY => self.estimated_delivery.into(),
            DELIVERED_AT => self.delivered_at.into(),
            _ => FieldValue::Null,
        }
    }

    fn from_row(row: &Row) -> Result<Self, GatewayError> {
        let code = row.get_u8(STATUS)?;
        let status = ShippingStatus::from_code(code).ok_or_else(|| GatewayError::UnknownCode {
            column: STATUS.to_string(),
            entity: "shipping status",
            code: i64::from(code),
        })?;

        Ok(Self {
            id: row.get_i32(SHIPPING_ID)?,
            carrier_id: row.get_i32(CARRIER_ID)?,
            tracking_number: row.get_string(TRACKING_NUMBER)?,
            status,
            estimated_delivery: row.get_timestamp(ESTIMATED_DELIVERY)?,
            delivered_at: row.get_opt_timestamp(DELIVERED_AT)?,
            mode: Mode::Update,
            notifier: Notifier::default(),
        })
    }

    fn add_call(&self) -> Result<Call, GatewayError> {
        shipping::add_call(self)
    }

    fn update_call(&self) -> Result<Call, GatewayError> {
        shipping::update_call(self)
    }
}
