//! Data-access modules, one per entity
//!
//! Each module declares its stored procedures once, as statics, along with
//! the column names they read and write, and builds bound [`Call`]s for
//! them. Execution goes through the [`Store`](crate::Store), which owns the
//! gateway. Column names equal parameter names throughout.
//!
//! [`Call`]: crate::gateway::Call

pub mod customers;
pub mod orders;
pub mod phones;
pub mod products;
pub mod shipping;
pub mod shipping_carriers;
pub mod transactions;
pub mod websites;
