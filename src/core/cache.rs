//! Single-slot listing cache
//!
//! Each caching entity type owns exactly one slot: the last full listing it
//! fetched plus an expiry instant. There is no eviction beyond the TTL and no
//! capacity bound. Every slot has its own async mutex, held across a refresh:
//! a second reader of the same key waits for that refresh instead of racing
//! it, while readers of other keys proceed.

use crate::core::error::StoreError;
use crate::gateway::Table;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// When a cached listing goes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Every hit pushes the expiry out by the TTL again
    Sliding,
    /// The listing expires TTL after it was fetched, hits or not
    Absolute,
}

/// TTL and expiration mode for one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub expiration: Expiration,
}

impl CachePolicy {
    pub const fn sliding(ttl: Duration) -> Self {
        Self {
            ttl,
            expiration: Expiration::Sliding,
        }
    }

    pub const fn absolute(ttl: Duration) -> Self {
        Self {
            ttl,
            expiration: Expiration::Absolute,
        }
    }

    pub const fn minutes(minutes: u64, expiration: Expiration) -> Self {
        Self {
            ttl: Duration::from_secs(minutes * 60),
            expiration,
        }
    }
}

#[derive(Debug)]
struct Slot {
    snapshot: Arc<Table>,
    expires_at: Instant,
}

type SlotCell = Arc<Mutex<Option<Slot>>>;

/// Keyed collection of single listing slots
#[derive(Debug, Default)]
pub struct ListingCache {
    slots: Mutex<HashMap<&'static str, SlotCell>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn cell(&self, key: &'static str) -> SlotCell {
        Arc::clone(self.slots.lock().await.entry(key).or_default())
    }

    async fn existing(&self, key: &'static str) -> Option<SlotCell> {
        self.slots.lock().await.get(key).cloned()
    }

    /// Return the cached listing for `key`, or run `refresh` and cache its
    /// result when the slot is empty or expired.
    ///
    /// A failed refresh leaves the slot empty and propagates the error.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        key: &'static str,
        policy: CachePolicy,
        refresh: F,
    ) -> Result<Arc<Table>, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Table, StoreError>>,
    {
        let cell = self.cell(key).await;
        let mut slot = cell.lock().await;
        let now = Instant::now();

        if let Some(current) = slot.as_mut() {
            if now < current.expires_at {
                if policy.expiration == Expiration::Sliding {
                    current.expires_at = now + policy.ttl;
                }
                tracing::trace!(cache = key, "listing cache hit");
                return Ok(Arc::clone(&current.snapshot));
            }
            *slot = None;
        }

        tracing::debug!(cache = key, "listing cache miss, refreshing");
        let snapshot = Arc::new(refresh().await?);
        *slot = Some(Slot {
            snapshot: Arc::clone(&snapshot),
            expires_at: Instant::now() + policy.ttl,
        });
        Ok(snapshot)
    }

    /// Drop the slot for `key` so the next read refetches.
    ///
    /// Waits for an in-progress refresh of the same key.
    pub async fn invalidate(&self, key: &'static str) {
        let Some(cell) = self.existing(key).await else {
            return;
        };
        if cell.lock().await.take().is_some() {
            tracing::debug!(cache = key, "listing cache invalidated");
        }
    }

    pub async fn clear(&self) {
        let cells: Vec<SlotCell> = self.slots.lock().await.values().cloned().collect();
        for cell in cells {
            cell.lock().await.take();
        }
    }

    /// Whether `key` currently holds an unexpired listing
    pub async fn is_fresh(&self, key: &'static str) -> bool {
        let Some(cell) = self.existing(key).await else {
            return false;
        };
        cell.lock()
            .await
            .as_ref()
            .is_some_and(|slot| Instant::now() < slot.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Row;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn listing(n: i32) -> Table {
        Table::from_rows(vec![Row::new().with("ID", n)])
    }

    async fn counted(calls: &AtomicUsize) -> Result<Table, StoreError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(listing(1))
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_returns_same_snapshot() {
        let cache = ListingCache::new();
        let calls = AtomicUsize::new(0);
        let policy = CachePolicy::minutes(15, Expiration::Absolute);

        let first = cache.get_or_refresh("carriers", policy, || counted(&calls)).await.unwrap();
        let second = cache.get_or_refresh("carriers", policy, || counted(&calls)).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_absolute_expiry_refetches_once() {
        let cache = ListingCache::new();
        let calls = AtomicUsize::new(0);
        let policy = CachePolicy::minutes(5, Expiration::Absolute);

        cache.get_or_refresh("tx", policy, || counted(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        cache.get_or_refresh("tx", policy, || counted(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        cache.get_or_refresh("tx", policy, || counted(&calls)).await.unwrap();
        cache.get_or_refresh("tx", policy, || counted(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sliding_expiry_extends_on_hit() {
        let cache = ListingCache::new();
        let calls = AtomicUsize::new(0);
        let policy = CachePolicy::minutes(5, Expiration::Sliding);

        cache.get_or_refresh("orders", policy, || counted(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        cache.get_or_refresh("orders", policy, || counted(&calls)).await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        cache.get_or_refresh("orders", policy, || counted(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(6 * 60)).await;
        cache.get_or_refresh("orders", policy, || counted(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = ListingCache::new();
        let policy = CachePolicy::minutes(10, Expiration::Sliding);

        let before = cache
            .get_or_refresh("customers", policy, || async { Ok::<_, StoreError>(listing(1)) })
            .await
            .unwrap();
        assert!(cache.is_fresh("customers").await);

        cache.invalidate("customers").await;
        assert!(!cache.is_fresh("customers").await);

        let after = cache
            .get_or_refresh("customers", policy, || async { Ok::<_, StoreError>(listing(2)) })
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.first().unwrap().get_i32("ID").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_cached() {
        let cache = ListingCache::new();
        let policy = CachePolicy::minutes(10, Expiration::Sliding);

        let result = cache
            .get_or_refresh("customers", policy, || async {
                Err::<Table, _>(StoreError::Internal("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_fresh("customers").await);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = ListingCache::new();
        let policy = CachePolicy::minutes(10, Expiration::Absolute);

        cache
            .get_or_refresh("customers", policy, || async { Ok::<_, StoreError>(listing(1)) })
            .await
            .unwrap();
        cache.invalidate("orders").await;
        assert!(cache.is_fresh("customers").await);
        assert!(!cache.is_fresh("orders").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_only_blocks_its_own_key() {
        let cache = Arc::new(ListingCache::new());
        let policy = CachePolicy::minutes(10, Expiration::Sliding);

        let slow = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move {
                cache
                    .get_or_refresh("customers", policy, || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<_, StoreError>(listing(1))
                    })
                    .await
            }
        });
        tokio::task::yield_now().await;

        let other = tokio::time::timeout(
            Duration::from_secs(1),
            cache.get_or_refresh("orders", policy, || async { Ok::<_, StoreError>(listing(2)) }),
        )
        .await;
        assert!(other.is_ok(), "orders waited on the customers refresh");

        slow.await.unwrap().unwrap();
        assert!(cache.is_fresh("customers").await);
    }
}
