//! Website procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::Website;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Websites";

pub const WEBSITE_ID: &str = "WebsiteID";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const URL: &str = "Url";
pub const DESCRIPTION: &str = "Description";

pub static ADD: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_AddWebsite @CustomerID, @Url, @Description"));
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetWebsiteByID @WebsiteID"));
pub static GET_BY_CUSTOMER: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetWebsitesByCustomerID @CustomerID"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_UpdateWebsite @WebsiteID, @CustomerID, @Url, @Description")
});
pub static DELETE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_DeleteWebsiteByID @WebsiteID"));

pub fn add_call(website: &Website) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(CUSTOMER_ID, website.customer_id())
        .bind(URL, website.url())
        .bind(DESCRIPTION, website.description())
        .finish()
}

pub fn update_call(website: &Website) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(WEBSITE_ID, website.id())
        .bind(CUSTOMER_ID, website.customer_id())
        .bind(URL, website.url())
        .bind(DESCRIPTION, website.description())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, website_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(WEBSITE_ID, website_id).finish()
}

pub fn by_customer(customer_id: i32) -> Result<Call, GatewayError> {
    GET_BY_CUSTOMER.call().bind(CUSTOMER_ID, customer_id).finish()
}
