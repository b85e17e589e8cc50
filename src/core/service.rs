//! Service trait for stored-procedure execution

use crate::core::error::GatewayError;
use crate::gateway::{Call, SqlValue, Table};
use async_trait::async_trait;

/// Backend that runs bound stored-procedure calls
///
/// Implementations translate a [`Call`] into whatever their database
/// speaks and hand back one of three raw result shapes. Interpreting those
/// shapes (new identifier, rows-affected flag) is the gateway's job, so
/// backends stay free of business conventions.
///
/// Every hard failure is returned as an error; implementations never
/// swallow a failure into a default value.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a procedure that returns a result set
    async fn fetch_table(&self, call: &Call) -> Result<Table, GatewayError>;

    /// Run a procedure and return the first column of its first row, if any
    async fn execute_scalar(&self, call: &Call) -> Result<Option<SqlValue>, GatewayError>;

    /// Run a procedure and return the number of affected rows
    async fn execute_non_query(&self, call: &Call) -> Result<u64, GatewayError>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Procedure;
    use std::sync::LazyLock;

    static PING: LazyLock<Procedure> = LazyLock::new(|| Procedure::parse("SP_Ping"));

    struct Fixed;

    #[async_trait]
    impl Executor for Fixed {
        async fn fetch_table(&self, _call: &Call) -> Result<Table, GatewayError> {
            Ok(Table::empty())
        }

        async fn execute_scalar(&self, _call: &Call) -> Result<Option<SqlValue>, GatewayError> {
            Ok(Some(SqlValue::Int(1)))
        }

        async fn execute_non_query(&self, _call: &Call) -> Result<u64, GatewayError> {
            Ok(0)
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    // The trait is object safe and usable behind Arc<dyn Executor>
    #[tokio::test]
    async fn test_executor_is_object_safe() {
        let executor: std::sync::Arc<dyn Executor> = std::sync::Arc::new(Fixed);
        let call = PING.call().finish().unwrap();
        assert!(executor.fetch_table(&call).await.unwrap().is_empty());
        assert_eq!(executor.execute_non_query(&call).await.unwrap(), 0);
        assert_eq!(executor.backend(), "fixed");
    }
}
