//! Customer procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::Customer;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Customers";

pub const CUSTOMER_ID: &str = "CustomerID";
pub const FIRST_NAME: &str = "FirstName";
pub const LAST_NAME: &str = "LastName";
pub const EMAIL: &str = "Email";
pub const ADDRESS: &str = "Address";
pub const IS_ACTIVE: &str = "IsActive";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_AddCustomer @FirstName, @LastName, @Email, @Address, @IsActive")
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetCustomerByID @CustomerID"));
pub static GET_BY_EMAIL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetCustomerByEmail @Email"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllCustomers"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_UpdateCustomer @CustomerID, @FirstName, @LastName, @Email, @Address, @IsActive",
    )
});
pub static SET_ACTIVE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_SetCustomerActive @CustomerID, @IsActive"));

pub fn add_call(customer: &Customer) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(FIRST_NAME, customer.first_name())
        .bind(LAST_NAME, customer.last_name())
        .bind(EMAIL, customer.email())
        .bind(ADDRESS, customer.address())
        .bind(IS_ACTIVE, customer.is_active())
        .finish()
}

pub fn update_call(customer: &Customer) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(CUSTOMER_ID, customer.id())
        .bind(FIRST_NAME, customer.first_name())
        .bind(LAST_NAME, customer.last_name())
        .bind(EMAIL, customer.email())
        .bind(ADDRESS, customer.address())
        .bind(IS_ACTIVE, customer.is_active())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, customer_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(CUSTOMER_ID, customer_id).finish()
}

pub fn by_email(email: &str) -> Result<Call, GatewayError> {
    GET_BY_EMAIL.call().bind(EMAIL, email).finish()
}

pub fn set_active(customer_id: i32, is_active: bool) -> Result<Call, GatewayError> {
    SET_ACTIVE
        .call()
        .bind(CUSTOMER_ID, customer_id)
        .bind(IS_ACTIVE, is_active)
        .finish()
}
