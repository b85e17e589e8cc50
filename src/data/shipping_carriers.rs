//! Shipping carrier procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::ShippingCarrier;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "ShippingCarriers";

pub const CARRIER_ID: &str = "CarrierID";
pub const NAME: &str = "Name";
pub const PHONE: &str = "Phone";
pub const WEBSITE: &str = "Website";
pub const IS_ACTIVE: &str = "IsActive";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_AddShippingCarrier @Name, @Phone, @Website, @IsActive")
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetShippingCarrierByID @CarrierID"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllShippingCarriers"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_UpdateShippingCarrier @CarrierID, @Name, @Phone, @Website, @IsActive")
});
pub static DELETE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_DeleteShippingCarrierByID @CarrierID"));

pub fn add_call(carrier: &ShippingCarrier) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(NAME, carrier.name())
        .bind(PHONE, carrier.phone())
        .bind(WEBSITE, carrier.website())
        .bind(IS_ACTIVE, carrier.is_active())
        .finish()
}

pub fn update_call(carrier: &ShippingCarrier) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(CARRIER_ID, carrier.id())
        .bind(NAME, carrier.name())
        .bind(PHONE, carrier.phone())
        .bind(WEBSITE, carrier.website())
        .bind(IS_ACTIVE, carrier.is_active())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, carrier_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(CARRIER_ID, carrier_id).finish()
}
