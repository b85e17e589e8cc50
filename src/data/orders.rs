//! Order procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::{Order, OrderStatus};
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Orders";

pub const ORDER_ID: &str = "OrderID";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const PRODUCT_ID: &str = "ProductID";
pub const QUANTITY: &str = "Quantity";
pub const TOTAL_AMOUNT: &str = "TotalAmount";
pub const ORDER_DATE: &str = "OrderDate";
pub const STATUS: &str = "Status";
pub const SHIPPING_ID: &str = "ShippingID";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_AddOrder @CustomerID, @ProductID, @Quantity, @TotalAmount, @OrderDate, @Status, @ShippingID",
    )
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetOrderByID @OrderID"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllOrders"));
pub static GET_BY_CUSTOMER: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetOrdersByCustomerID @CustomerID"));
pub static GET_BY_STATUS: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetOrdersByStatus @Status"));
/// Status only moves through the transition procedures, never through update
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_UpdateOrder @OrderID, @CustomerID, @ProductID, @Quantity, @TotalAmount, @OrderDate, @ShippingID",
    )
});
pub static MARK_AS_ARRIVED: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_MarkOrderAsArrived @OrderID"));
pub static CHANGE_TO_DELIVERED: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_ChangeOrderToDelivered @OrderID"));
pub static CANCEL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_CancelOrder @OrderID"));
pub static ASSIGN_SHIPPING: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_AssignOrderShipping @OrderID, @ShippingID"));

pub fn add_call(order: &Order) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(CUSTOMER_ID, order.customer_id())
        .bind(PRODUCT_ID, order.product_id())
        .bind(QUANTITY, order.quantity())
        .bind(TOTAL_AMOUNT, order.total_amount())
        .bind(ORDER_DATE, order.order_date())
        .bind(STATUS, order.status().code())
        .bind(SHIPPING_ID, order.shipping_id())
        .finish()
}

pub fn update_call(order: &Order) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(ORDER_ID, order.id())
        .bind(CUSTOMER_ID, order.customer_id())
        .bind(PRODUCT_ID, order.product_id())
        .bind(QUANTITY, order.quantity())
        .bind(TOTAL_AMOUNT, order.total_amount())
        .bind(ORDER_DATE, order.order_date())
        .bind(SHIPPING_ID, order.shipping_id())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, order_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(ORDER_ID, order_id).finish()
}

pub fn by_customer(customer_id: i32) -> Result<Call, GatewayError> {
    GET_BY_CUSTOMER.call().bind(CUSTOMER_ID, customer_id).finish()
}

pub fn by_status(status: OrderStatus) -> Result<Call, GatewayError> {
    GET_BY_STATUS.call().bind(STATUS, status.code()).finish()
}

pub fn assign_shipping(order_id: i32, shipping_id: i32) -> Result<Call, GatewayError> {
    ASSIGN_SHIPPING
        .call()
        .bind(ORDER_ID, order_id)
        .bind(SHIPPING_ID, shipping_id)
        .finish()
}
