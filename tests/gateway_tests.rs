//! Gateway failure semantics, binding and cancellation through the entities

mod common;

use common::*;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use storefront::core::{Executor, GatewayError};
use storefront::data::{customers, products};
use storefront::gateway::{Call, SqlValue, Table};
use storefront::storage::{MemoryTables, Outcome};
use storefront::prelude::*;
use tokio_util::sync::CancellationToken;

/// Delegates to the in-memory database, holding inserts for `delay`
struct SlowInserts {
    inner: InMemoryDatabase,
    delay: Duration,
    finished: Arc<AtomicBool>,
}

#[async_trait]
impl Executor for SlowInserts {
    async fn fetch_table(&self, call: &Call) -> Result<Table, GatewayError> {
        self.inner.fetch_table(call).await
    }

    async fn execute_scalar(&self, call: &Call) -> Result<Option<SqlValue>, GatewayError> {
        tokio::time::sleep(self.delay).await;
        let scalar = self.inner.execute_scalar(call).await;
        self.finished.store(true, Ordering::SeqCst);
        scalar
    }

    async fn execute_non_query(&self, call: &Call) -> Result<u64, GatewayError> {
        self.inner.execute_non_query(call).await
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}

#[tokio::test]
async fn test_hard_failure_propagates_and_leaves_entity_unsaved() {
    let (store, db) = Store::in_memory();
    db.fail_next(products::ADD.name(), "connection reset");

    let mut product = Product::new("Widget", None, price("9.99"), 1, true);
    let err = product.save(&store).await.unwrap_err();

    assert_eq!(err.error_code(), "GATEWAY_QUERY");
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(product.id(), UNSAVED_ID);
    assert_eq!(product.mode(), Mode::AddNew);

    assert!(product.save(&store).await.unwrap());
    assert_eq!(product.id(), 1);
}

#[tokio::test]
async fn test_missing_identifier_is_a_soft_failure() {
    let (store, db) = Store::in_memory();

    let scalars = [
        None,
        Some(SqlValue::Null),
        Some(SqlValue::from("n/a")),
        Some(SqlValue::Int(0)),
        // a success flag from a TINYINT(1) column is not an identifier
        Some(SqlValue::Bool(true)),
    ];
    for scalar in scalars {
        db.register(products::ADD.name(), move |_call: &Call, _tables: &mut MemoryTables| {
            Ok(Outcome::Scalar(scalar.clone()))
        });

        let mut product = Product::new("Widget", None, price("9.99"), 1, true);
        assert!(!product.save(&store).await.unwrap());
        assert_eq!(product.id(), UNSAVED_ID);
        assert_eq!(product.mode(), Mode::AddNew);
    }
}

#[tokio::test]
async fn test_numeric_text_identifier_is_accepted() {
    let (store, db) = Store::in_memory();
    db.register(products::ADD.name(), |_call: &Call, _tables: &mut MemoryTables| {
        Ok(Outcome::Scalar(Some(SqlValue::from("42"))))
    });

    let mut product = Product::new("Widget", None, price("9.99"), 1, true);
    assert!(product.save(&store).await.unwrap());
    assert_eq!(product.id(), 42);
}

#[tokio::test]
async fn test_update_of_vanished_row_is_a_soft_failure() {
    let (store, _db) = Store::in_memory();
    let mut product = saved_product(&store, "Widget", "9.99").await;
    assert!(product.delete(&store).await.unwrap());

    product.set_quantity(99).unwrap();
    assert!(!product.save(&store).await.unwrap());
}

#[tokio::test]
async fn test_unknown_procedure_is_a_hard_failure() {
    let db = InMemoryDatabase::new();
    let store = Store::new(Arc::new(db), StoreConfig::default());

    let err = Customer::find(&store, 1).await.unwrap_err();
    assert_eq!(err.error_code(), "GATEWAY_UNKNOWN_PROCEDURE");
}

#[tokio::test]
async fn test_row_with_unknown_status_code_fails_mapping() {
    let (store, db) = Store::in_memory();
    let order = saved_order(&store).await;
    db.register(
        storefront::data::orders::GET_BY_ID.name(),
        |_call: &Call, tables: &mut MemoryTables| {
            let mut row = tables.rows(storefront::data::orders::TABLE)[0].clone();
            row.set(storefront::data::orders::STATUS, 9u8);
            Ok(Outcome::Rows(storefront::gateway::Table::from_rows(vec![row])))
        },
    );

    let err = Order::find(&store, order.id()).await.unwrap_err();
    assert!(matches!(err, StoreError::Gateway(GatewayError::UnknownCode { code: 9, .. })));
}

#[test]
fn test_named_binding_is_checked_before_dispatch() {
    let unknown = customers::GET_BY_ID
        .call()
        .bind(customers::CUSTOMER_ID, 1)
        .bind("CustomerId", 1)
        .finish()
        .unwrap_err();
    assert_eq!(unknown.error_code(), "GATEWAY_UNKNOWN_PARAMETER");

    let unbound = customers::SET_ACTIVE
        .call()
        .bind(customers::CUSTOMER_ID, 1)
        .finish()
        .unwrap_err();
    assert!(matches!(
        unbound,
        GatewayError::UnboundParameter { ref parameter, .. } if parameter == customers::IS_ACTIVE
    ));
}

#[test]
fn test_binding_order_is_irrelevant() {
    let call = customers::SET_ACTIVE
        .call()
        .bind(customers::IS_ACTIVE, false)
        .bind(customers::CUSTOMER_ID, 7)
        .finish()
        .unwrap();
    let values: Vec<_> = call.values().cloned().collect();
    assert_eq!(values, vec![SqlValue::Int(7), SqlValue::Bool(false)]);
}

#[tokio::test]
async fn test_cancelled_token_stops_before_dispatch() {
    let (store, db) = Store::in_memory();
    let token = CancellationToken::new();
    let cancellable = store.with_cancellation(token.clone());

    let mut customer = Customer::new("Ada", "Lovelace", "ada@example.com", None);
    assert!(customer.save(&cancellable).await.unwrap());

    token.cancel();
    let mut second = Customer::new("Charles", "Babbage", "charles@example.com", None);
    let err = second.save(&cancellable).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(second.id(), UNSAVED_ID);
    assert_eq!(db.calls_to(customers::ADD.name()).len(), 1);

    // the original store carries no token
    assert!(second.save(&store).await.unwrap());
}

#[tokio::test]
async fn test_cancellation_is_not_a_business_rule() {
    let (store, _db) = Store::in_memory();
    let token = CancellationToken::new();
    token.cancel();

    let err = Product::find(&store.with_cancellation(token), 1).await.unwrap_err();
    assert!(!err.is_business_rule());
    assert_eq!(err.error_code(), "CANCELLED");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_in_flight_abandons_the_await_not_the_command() {
    let db = InMemoryDatabase::with_retail_procedures();
    let finished = Arc::new(AtomicBool::new(false));
    let executor = SlowInserts {
        inner: db.clone(),
        delay: Duration::from_millis(100),
        finished: Arc::clone(&finished),
    };
    let token = CancellationToken::new();
    let store = Store::new(Arc::new(executor), StoreConfig::default())
        .with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let mut customer = Customer::new("Ada", "Lovelace", "ada@example.com", None);
    let err = customer.save(&store).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(customer.id(), UNSAVED_ID);
    assert_eq!(customer.mode(), Mode::AddNew);
    assert!(!finished.load(Ordering::SeqCst));
    canceller.await.unwrap();

    // the dispatched insert still lands
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(db.rows(customers::TABLE).len(), 1);
}
