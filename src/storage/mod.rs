//! Executor implementations for different backends

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "in-memory")]
pub mod retail;

#[cfg(feature = "in-memory")]
pub use in_memory::{InMemoryDatabase, MemoryTables, Outcome, RecordedCall, handlers};
#[cfg(feature = "mysql")]
pub use mysql::MysqlDatabase;
#[cfg(feature = "in-memory")]
pub use retail::install_retail_procedures;
