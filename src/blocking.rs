//! Synchronous entry point
//!
//! [`BlockingStore`] owns a current-thread runtime and drives any entity
//! operation to completion on the calling thread. Every async operation has
//! a blocking twin through it:
//!
//! ```rust,ignore
//! let blocking = BlockingStore::in_memory()?;
//! let mut product = Product::new("Widget", None, price, 0, false);
//! blocking.block_on(product.save(blocking.store()))?;
//!
//! let found = blocking.run(|store| async move { Product::find(&store, 1).await })?;
//! ```
//!
//! Must not be used from inside an async context: the runtime panics when
//! asked to block a thread that is already driving one.

use crate::core::error::{StoreError, StoreResult};
use crate::store::Store;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

pub struct BlockingStore {
    runtime: Runtime,
    store: Store,
}

impl std::fmt::Debug for BlockingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingStore")
            .field("store", &self.store)
            .finish()
    }
}

impl BlockingStore {
    pub fn new(store: Store) -> StoreResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Internal(format!("failed to build runtime: {}", e)))?;
        Ok(Self { runtime, store })
    }

    /// A blocking store over a fresh in-memory retail database
    #[cfg(feature = "in-memory")]
    pub fn in_memory() -> StoreResult<(Self, crate::storage::InMemoryDatabase)> {
        let (store, db) = Store::in_memory();
        Ok((Self::new(store)?, db))
    }

    /// Connect to MySQL, blocking until the pool is ready
    #[cfg(feature = "mysql")]
    pub fn connect(config: crate::config::StoreConfig) -> StoreResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Internal(format!("failed to build runtime: {}", e)))?;
        let store = runtime.block_on(Store::connect(config))?;
        Ok(Self { runtime, store })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Drive `future` to completion on this store's runtime
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run an operation that needs its own handle on the store
    pub fn run<T, F, Fut>(&self, op: F) -> T
    where
        F: FnOnce(Store) -> Fut,
        Fut: Future<Output = T>,
    {
        self.runtime.block_on(op(self.store.clone()))
    }
}
