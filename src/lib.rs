//! # Storefront
//!
//! Data-access and business layers for a small retail store: customers,
//! products, orders, payment transactions, shipments and carriers.
//!
//! ## Layers
//!
//! - **Gateway** ([`gateway`], [`data`]): every database interaction is a
//!   stored-procedure call. A call produces a table, a new identifier, or a
//!   rows-affected flag.
//! - **Entities** ([`entities`]): one business object per table with
//!   validated setters, change notification, an AddNew/Update lifecycle and
//!   status transitions.
//!
//! ## Features
//!
//! - **Named procedure binding**: parameters are bound by name and checked
//!   before anything reaches the database
//! - **Declarative validation**: static rule tables per entity
//! - **Status lifecycles**: illegal order and shipment transitions are
//!   rejected up front
//! - **Listing cache**: per-entity TTL with sliding or absolute expiry
//! - **Change events**: broadcast of property, save, delete and status events
//! - **Blocking twins**: every async operation through [`BlockingStore`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! let (store, _db) = Store::in_memory();
//!
//! let mut product = Product::new("Widget", None, Decimal::new(999, 2), 0, false);
//! product.save(&store).await?;
//! product.make_available(&store).await?;
//!
//! let mut order = Order::for_product(&customer, &product, 2);
//! order.save(&store).await?;
//! order.mark_as_arrived(&store).await?;
//! ```

pub mod blocking;
pub mod config;
pub mod core;
pub mod data;
pub mod entities;
pub mod gateway;
pub mod logging;
pub mod storage;
pub mod store;

pub use blocking::BlockingStore;
pub use store::Store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Entity, EventBus, Lifecycle, Mode, StoreError, StoreEvent, StoreResult, UNSAVED_ID,
    };

    // === Entities ===
    pub use crate::entities::{
        Customer, Order, OrderStatus, PaymentMethod, Phone, PhoneKind, Product, Shipping,
        ShippingCarrier, ShippingStatus, Transaction, Website,
    };

    // === Store ===
    pub use crate::config::StoreConfig;
    pub use crate::{BlockingStore, Store};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryDatabase;
    #[cfg(feature = "mysql")]
    pub use crate::storage::MysqlDatabase;

    // === External dependencies ===
    pub use chrono::{NaiveDateTime, Utc};
    pub use rust_decimal::Decimal;
}
