//! Transaction procedures

use crate::core::entity::Entity;
use crate::core::error::GatewayError;
use crate::entities::Transaction;
use crate::gateway::{Call, Procedure};
use std::sync::LazyLock;

pub const TABLE: &str = "Transactions";

pub const TRANSACTION_ID: &str = "TransactionID";
pub const ORDER_ID: &str = "OrderID";
pub const AMOUNT: &str = "Amount";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const TRANSACTION_DATE: &str = "TransactionDate";
pub const IS_DONE: &str = "IsDone";
pub const NOTES: &str = "Notes";

pub static ADD: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_AddTransaction @OrderID, @Amount, @PaymentMethod, @TransactionDate, @IsDone, @Notes",
    )
});
pub static GET_BY_ID: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetTransactionByID @TransactionID"));
pub static GET_ALL: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetAllTransactions"));
pub static GET_BY_ORDER: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_GetTransactionsByOrderID @OrderID"));
pub static UPDATE: LazyLock<Procedure> = LazyLock::new(|| {
    Procedure::parse(
        "EXEC SP_UpdateTransaction @TransactionID, @OrderID, @Amount, @PaymentMethod, @TransactionDate, @Notes",
    )
});
pub static FLAG_AS_DONE: LazyLock<Procedure> =
    LazyLock::new(|| Procedure::parse("EXEC SP_FlagTransactionAsDone @TransactionID"));

pub fn add_call(transaction: &Transaction) -> Result<Call, GatewayError> {
    ADD.call()
        .bind(ORDER_ID, transaction.order_id())
        .bind(AMOUNT, transaction.amount())
        .bind(PAYMENT_METHOD, transaction.payment_method().code())
        .bind(TRANSACTION_DATE, transaction.transaction_date())
        .bind(IS_DONE, transaction.is_done())
        .bind(NOTES, transaction.notes())
        .finish()
}

pub fn update_call(transaction: &Transaction) -> Result<Call, GatewayError> {
    UPDATE
        .call()
        .bind(TRANSACTION_ID, transaction.id())
        .bind(ORDER_ID, transaction.order_id())
        .bind(AMOUNT, transaction.amount())
        .bind(PAYMENT_METHOD, transaction.payment_method().code())
        .bind(TRANSACTION_DATE, transaction.transaction_date())
        .bind(NOTES, transaction.notes())
        .finish()
}

pub fn by_id(procedure: &'static Procedure, transaction_id: i32) -> Result<Call, GatewayError> {
    procedure.call().bind(TRANSACTION_ID, transaction_id).finish()
}

pub fn by_order(order_id: i32) -> Result<Call, GatewayError> {
    GET_BY_ORDER.call().bind(ORDER_ID, order_id).finish()
}
