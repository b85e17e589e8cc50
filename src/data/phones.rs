//! Phone procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::Phone;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Phones";

pub const PHONE_ID: &str = "PhoneID";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const NUMBER: &str = "Number";
pub const KIND: &str = "Kind";
pub const IS_ACTIVE: &str = "IsActive";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_AddPhone @CustomerID, @Number, @Kind, @IsActive")
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetPhoneByID @PhoneID"));
pub static GET_BY_CUSTOMER: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetPhonesByCustomerID @CustomerID"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_UpdatePhone @PhoneID, @CustomerID, @Number, @Kind, @IsActive")
});
pub static DEACTIVATE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_DeactivatePhone @PhoneID"));

pub fn add_call(phone: &Phone) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(CUSTOMER_ID, phone.customer_id())
        .bind(NUMBER, phone.number())
        .bind(KIND, phone.kind().code())
        .bind(IS_ACTIVE, phone.is_active())
        .finish()
}

pub fn update_call(phone: &Phone) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(PHONE_ID, phone.id())
        .bind(CUSTOMER_ID, phone.customer_id())
        .bind(NUMBER, phone.number())
        .bind(KIND, phone.kind().code())
        .bind(IS_ACTIVE, phone.is_active())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, phone_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(PHONE_ID, phone_id).finish()
}

pub fn by_customer(customer_id: i32) -> Result<Call, GatewayError> {
    GET_BY_CUSTOMER.call().bind(CUSTOMER_ID, customer_id).finish()
}
