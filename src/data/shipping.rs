//! Shipping procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::{Shipping, ShippingStatus};
use crate::gateway::{Call, Procedure};
use chrono::NaiveDateTime;
use std::sync::LazyLock;

pub const TABLE: &str = "Shipping";

pub const SHIPPING_ID: &str = "ShippingID";
pub const CARRIER_ID: &str = "CarrierID";
pub const TRACKING_NUMBER: &str = "TrackingNumber";
pub const STATUS: &str = "Status";
pub const ESTIMATED_DELIVERY: &str = "EstimatedDelivery";
pub const DELIVERED_AT: &str = "DeliveredAt";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_AddShipping @CarrierID, @TrackingNumber, @Status, @EstimatedDelivery, @DeliveredAt",
    )
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetShippingByID @ShippingID"));
pub static GET_BY_TRACKING_NUMBER: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetShippingByTrackingNumber @TrackingNumber"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllShipping"));
pub static GET_BY_STATUS: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetShippingByStatus @Status"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_UpdateShipping @ShippingID, @CarrierID, @TrackingNumber, @EstimatedDelivery",
    )
});
pub static MARK_IN_TRANSIT: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_MarkShippingInTransit @ShippingID"));
pub static MARK_AS_ARRIVED: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_MarkShippingAsArrived @ShippingID, @DeliveredAt"));
pub static CANCEL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_CancelShipping @ShippingID"));
pub static REINSTATE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_ReinstateShipping @ShippingID"));

pub fn add_call(shipping: &Shipping) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(CARRIER_ID, shipping.carrier_id())
        .bind(TRACKING_NUMBER, shipping.tracking_number())
        .bind(STATUS, shipping.status().code())
        .bind(ESTIMATED_DELIVERY, shipping.estimated_delivery())
        .bind(DELIVERED_AT, shipping.delivered_at())
        .finish()
}

pub fn update_call(shipping: &Shipping) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(SHIPPING_ID, shipping.id())
        .bind(CARRIER_ID, shipping.carrier_id())
        .bind(TRACKING_NUMBER, shipping.tracking_number())
        .bind(ESTIMATED_DELIVERY, shipping.estimated_delivery())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, shipping_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(SHIPPING_ID, shipping_id).finish()
}

pub fn by_tracking_number(tracking_number: &str) -> Result<Call, GatewayError> {
    GET_BY_TRACKING_NUMBER
        .call()
        .bind(TRACKING_NUMBER, tracking_number)
        .finish()
}

pub fn by_status(status: ShippingStatus) -> Result<Call, GatewayError> {
    GET_BY_STATUS.call().bind(STATUS, status.code()).finish()
}

pub fn mark_as_arrived(
    shipping_id: i32,
    delivered_at: NaiveDateTime,
) -> Result<Call, GatewayError> {
    MARK_AS_ARRIVED
        .call()
        .bind(SHIPPING_ID, shipping_id)
        .bind(DELIVERED_AT, delivered_at)
        .finish()
}
