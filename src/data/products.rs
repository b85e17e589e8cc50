//! Product procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::Product;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Products";

pub const PRODUCT_ID: &str = "ProductID";
pub const NAME: &str = "Name";
pub const DESCRIPTION: &str = "Description";
pub const PRICE: &str = "Price";
pub const QUANTITY: &str = "Quantity";
pub const IS_AVAILABLE: &str = "IsAvailable";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse("EXEC SP_AddProduct @Name, @Description, @Price, @Quantity, @IsAvailable")
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetProductByID @ProductID"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllProducts"));
pub static GET_AVAILABLE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAvailableProducts"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_UpdateProduct @ProductID, @Name, @Description, @Price, @Quantity, @IsAvailable",
    )
});
pub static DELETE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_DeleteProductByID @ProductID"));
pub static MAKE_AVAILABLE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_MakeProductAvailable @ProductID"));
pub static MAKE_UNAVAILABLE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_MakeProductUnavailable @ProductID"));

pub fn add_call(product: &Product) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(NAME, product.name())
        .bind(DESCRIPTION, product.description())
        .bind(PRICE, product.price())
        .bind(QUANTITY, product.quantity())
        .bind(IS_AVAILABLE, product.is_available())
        .finish()
}

pub fn update_call(product: &Product) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(PRODUCT_ID, product.id())
        .bind(NAME, product.name())
        .bind(DESCRIPTION, product.description())
        .bind(PRICE, product.price())
        .bind(QUANTITY, product.quantity())
        .bind(IS_AVAILABLE, product.is_available())
        .finish()
}

/// Bind the key of any single-product procedure
pub fn by_id(procedure: &'static Procedure, product_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(PRODUCT_ID, product_id).finish()
}
