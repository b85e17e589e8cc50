//! Persistence gateway
//!
//! The gateway is the only path from the business objects to the database.
//! It takes a bound stored-procedure [`Call`] and produces one of three
//! shapes that every data-access module consumes the same way:
//!
//! - **fetch**: a [`Table`], possibly empty. Zero rows means "not found".
//! - **insert**: the new identifier, or `None` when the procedure did not
//!   hand one back (the insert is presumed to have failed).
//! - **mutate**: `true` when at least one row was affected.
//!
//! Hard failures always propagate. There are no retries.
//!
//! # Cancellation
//!
//! A gateway may carry a [`CancellationToken`]. The token is checked before
//! dispatch; once a command is in flight it runs to completion on its own
//! task and cancellation only abandons the local await.

pub mod procedure;
pub mod table;
pub mod value;

pub use procedure::{Call, CallBuilder, Procedure, scan_parameters};
pub use table::{Row, Table};
pub use value::SqlValue;

use crate::core::error::{GatewayError, StoreError};
use crate::core::service::Executor;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cloneable handle over a shared [`Executor`]
#[derive(Clone)]
pub struct Gateway {
    executor: Arc<dyn Executor>,
    cancellation: Option<CancellationToken>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("backend", &self.executor.backend())
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

impl Gateway {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            executor,
            cancellation: None,
        }
    }

    /// A copy of this gateway whose calls observe `token`
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            cancellation: Some(token),
        }
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Tabular fetch
    pub async fn fetch(&self, call: Call) -> Result<Table, StoreError> {
        self.run(call, |executor, call| async move {
            executor.fetch_table(&call).await
        })
        .await
    }

    /// Scalar insert. Returns the new identifier, or `None` when no usable
    /// positive integer came back.
    pub async fn insert(&self, call: Call) -> Result<Option<i32>, StoreError> {
        let procedure = call.name().to_string();
        let scalar = self
            .run(call, |executor, call| async move {
                executor.execute_scalar(&call).await
            })
            .await?;

        let id = scalar
            .as_ref()
            .and_then(SqlValue::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .filter(|id| *id > 0);

        if id.is_none() {
            tracing::debug!(
                procedure = %procedure,
                scalar = ?scalar,
                "insert returned no identifier"
            );
        }
        Ok(id)
    }

    /// Update or delete. True only if at least one row was affected.
    pub async fn mutate(&self, call: Call) -> Result<bool, StoreError> {
        let affected = self
            .run(call, |executor, call| async move {
                executor.execute_non_query(&call).await
            })
            .await?;
        Ok(affected > 0)
    }

    async fn run<T, F, Fut>(&self, call: Call, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn Executor>, Call) -> Fut,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        tracing::debug!(
            procedure = %call.name(),
            backend = self.executor.backend(),
            "executing stored procedure"
        );
        let executor = Arc::clone(&self.executor);

        let Some(token) = &self.cancellation else {
            return op(executor, call).await.map_err(StoreError::from);
        };

        if token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let procedure = call.name().to_string();
        let task = tokio::spawn(op(executor, call));
        tokio::select! {
            biased;
            joined = task => match joined {
                Ok(result) => result.map_err(StoreError::from),
                Err(e) => Err(StoreError::Internal(format!("gateway task failed: {}", e))),
            },
            _ = token.cancelled() => {
                tracing::warn!(procedure = %procedure, "cancelled while command in flight");
                Err(StoreError::Cancelled)
            }
        }
    }
}
