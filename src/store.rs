//! Store context shared by every entity operation
//!
//! A [`Store`] bundles the gateway, the listing cache and its policies, and
//! the event bus. Entities receive it by reference; it is cheap to clone.

use crate::config::StoreConfig;
use crate::core::cache::ListingCache;
use crate::core::entity::{Entity, Mode, UNSAVED_ID, first_record, records};
use crate::core::error::StoreResult;
use crate::core::events::{EventBus, SaveKind, StoreEvent};
use crate::core::service::Executor;
use crate::gateway::{Call, Gateway, Table};
use std::fmt::Display;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct Store {
    gateway: Gateway,
    cache: Arc<ListingCache>,
    config: Arc<StoreConfig>,
    events: EventBus,
}

impl Store {
    pub fn new(executor: Arc<dyn Executor>, config: StoreConfig) -> Self {
        let events = EventBus::new(config.events.capacity);
        Self {
            gateway: Gateway::new(executor),
            cache: Arc::new(ListingCache::new()),
            config: Arc::new(config),
            events,
        }
    }

    /// A store over a fresh in-memory database with the retail procedures
    /// installed. Returns the database too, for inspection.
    #[cfg(feature = "in-memory")]
    pub fn in_memory() -> (Self, crate::storage::InMemoryDatabase) {
        let db = crate::storage::InMemoryDatabase::with_retail_procedures();
        let store = Self::new(Arc::new(db.clone()), StoreConfig::default());
        (store, db)
    }

    /// Connect to MySQL using `config.database`.
    ///
    /// Unusable settings fail with `StoreError::Config` before any network work.
    #[cfg(feature = "mysql")]
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let db = crate::storage::MysqlDatabase::connect(&config.database).await?;
        Ok(Self::new(Arc::new(db), config))
    }

    /// A clone whose gateway calls observe `token`.
    ///
    /// Cache and event bus stay shared with the original.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            gateway: self.gateway.with_cancellation(token),
            cache: Arc::clone(&self.cache),
            config: Arc::clone(&self.config),
            events: self.events.clone(),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Validate, then add or update depending on the entity's mode.
    ///
    /// `Ok(false)` is a soft failure: the add returned no identifier or the
    /// update touched no rows. The entity is unchanged in that case.
    pub async fn save<T: Entity>(&self, entity: &mut T) -> StoreResult<bool> {
        entity.validate()?;

        let (saved, kind) = match entity.mode() {
            Mode::AddNew => match self.gateway.insert(entity.add_call()?).await? {
                Some(id) => {
                    entity.mark_persisted(id);
                    (true, SaveKind::Added)
                }
                None => (false, SaveKind::Added),
            },
            Mode::Update => (
                self.gateway.mutate(entity.update_call()?).await?,
                SaveKind::Updated,
            ),
        };

        if saved {
            tracing::info!(
                entity_type = T::ENTITY_TYPE,
                id = entity.id(),
                kind = ?kind,
                "entity saved"
            );
            self.invalidate::<T>().await;
            self.events.publish(StoreEvent::Saved {
                entity_type: T::ENTITY_TYPE.to_string(),
                entity_id: entity.id(),
                kind,
            });
        } else {
            tracing::warn!(
                entity_type = T::ENTITY_TYPE,
                id = entity.id(),
                kind = ?kind,
                "save reported no change"
            );
        }
        Ok(saved)
    }

    /// First row of `call` mapped to an entity; zero rows is `None`
    pub async fn find_one<T: Entity>(&self, call: Call) -> StoreResult<Option<T>> {
        let table = self.gateway.fetch(call).await?;
        Ok(first_record(&table)?)
    }

    /// Every row of `call` mapped to an entity
    pub async fn find_many<T: Entity>(&self, call: Call) -> StoreResult<Vec<T>> {
        let table = self.gateway.fetch(call).await?;
        Ok(records(&table)?)
    }

    /// Raw listing for `T`, served from the listing cache when `T` caches
    /// and a policy is configured for it
    pub async fn listing<T: Entity>(&self, call: Call) -> StoreResult<Arc<Table>> {
        let cached = T::CACHE_KEY.and_then(|key| Some((key, self.config.cache.policy_for(key)?)));
        match cached {
            Some((key, policy)) => {
                self.cache
                    .get_or_refresh(key, policy, || self.gateway.fetch(call))
                    .await
            }
            None => Ok(Arc::new(self.gateway.fetch(call).await?)),
        }
    }

    /// Run a delete procedure for `entity`
    pub async fn delete<T: Entity>(&self, entity: &T, call: Call) -> StoreResult<bool> {
        if entity.id() == UNSAVED_ID {
            tracing::warn!(entity_type = T::ENTITY_TYPE, "deleting an entity that was never saved");
        }
        let deleted = self.gateway.mutate(call).await?;
        if deleted {
            tracing::info!(entity_type = T::ENTITY_TYPE, id = entity.id(), "entity deleted");
            self.invalidate::<T>().await;
            self.events.publish(StoreEvent::Deleted {
                entity_type: T::ENTITY_TYPE.to_string(),
                entity_id: entity.id(),
            });
        } else {
            tracing::warn!(
                entity_type = T::ENTITY_TYPE,
                id = entity.id(),
                "delete affected no rows"
            );
        }
        Ok(deleted)
    }

    /// Run a status or flag procedure. The caller has already checked the
    /// transition and applies the new state when this returns `Ok(true)`.
    pub async fn change_status<T: Entity>(
        &self,
        entity_id: i32,
        from: impl Display,
        to: impl Display,
        call: Call,
    ) -> StoreResult<bool> {
        let changed = self.apply::<T>(call).await?;
        if changed {
            tracing::info!(
                entity_type = T::ENTITY_TYPE,
                id = entity_id,
                from = %from,
                to = %to,
                "status changed"
            );
            self.events.publish(StoreEvent::StatusChanged {
                entity_type: T::ENTITY_TYPE.to_string(),
                entity_id,
                from: from.to_string(),
                to: to.to_string(),
            });
        } else {
            tracing::warn!(
                entity_type = T::ENTITY_TYPE,
                id = entity_id,
                to = %to,
                "status change affected no rows"
            );
        }
        Ok(changed)
    }

    /// Run any other mutating procedure of `T`, dropping its cached listing
    /// when rows were affected
    pub async fn apply<T: Entity>(&self, call: Call) -> StoreResult<bool> {
        let changed = self.gateway.mutate(call).await?;
        if changed {
            self.invalidate::<T>().await;
        }
        Ok(changed)
    }

    async fn invalidate<T: Entity>(&self) {
        if let Some(key) = T::CACHE_KEY {
            self.cache.invalidate(key).await;
        }
    }
}
