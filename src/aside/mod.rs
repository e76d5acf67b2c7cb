//! Cache-Aside Orchestration
//!
//! One generic orchestrator per entity kind. Reads try the cache first and
//! fall back to the record store, repopulating on the way out. Creates write
//! the store first and then populate the per-id (and lookaside) slots.
//!
//! Consistency rules:
//! - A cache miss always reconciles against the store; a cache failure is
//!   treated as a miss, logged and counted.
//! - Per-id entries may be stale for up to `entity_ttl`.
//! - The collection entry is never touched by creates, so a listing can miss
//!   new entities for up to `collection_ttl`, independently of per-id reads.
//! - The lookaside entry only short-circuits creates; its absence proves
//!   nothing and the store's constraint stays authoritative.

pub mod keys;
mod stats;


use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::cache::CacheStore;
use crate::codec::{EntityCodec, JsonCodec};
use crate::error::{Result, ServiceError, StoreError};
use crate::models::Entity;
use crate::store::RecordStore;

pub use stats::{AsideStats, AsideStatsSnapshot};

// == Cache Policy ==
/// TTLs applied by an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Lifetime of `<kind>:<id>` entries
    pub entity_ttl: Duration,
    /// Lifetime of the `<kind>:all` snapshot
    pub collection_ttl: Duration,
    /// Lifetime of `<kind>:<field>:<value>` entries, for kinds with a unique field
    pub lookaside_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            entity_ttl: Duration::from_secs(300),
            collection_ttl: Duration::from_secs(60),
            lookaside_ttl: Duration::from_secs(300),
        }
    }
}

// == Cache Aside ==
/// Coordinates a [`CacheStore`] and a [`RecordStore`] for entity kind `E`.
pub struct CacheAside<E: Entity, C = JsonCodec> {
    cache: Arc<dyn CacheStore>,
    records: Arc<dyn RecordStore<E>>,
    codec: C,
    policy: CachePolicy,
    stats: AsideStats,
}

impl<E: Entity> CacheAside<E, JsonCodec> {
    /// Orchestrator with JSON payloads.
    pub fn new(
        cache: Arc<dyn CacheStore>,
        records: Arc<dyn RecordStore<E>>,
        policy: CachePolicy,
    ) -> Self {
        Self::with_codec(cache, records, JsonCodec, policy)
    }
}

impl<E, C> CacheAside<E, C>
where
    E: Entity,
    C: EntityCodec<E> + EntityCodec<Vec<E>>,
{
    pub fn with_codec(
        cache: Arc<dyn CacheStore>,
        records: Arc<dyn RecordStore<E>>,
        codec: C,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            records,
            codec,
            policy,
            stats: AsideStats::new(),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn stats(&self) -> AsideStatsSnapshot {
        self.stats.snapshot()
    }

    // == Read By Id ==
    /// Returns the entity, from `<kind>:<id>` when cached, otherwise from the
    /// store, caching it for `entity_ttl`. Absent entities are never cached.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn read_by_id(&self, id: i64) -> Result<E> {
        let key = keys::entity(E::KIND, id);

        if let Some(entity) = self.cached::<E>(&key).await {
            return Ok(entity);
        }

        self.stats.record_store_read();
        let entity = self
            .records
            .get_by_id(id)
            .await
            .map_err(|err| self.store_failure(err))?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", E::KIND, id)))?;

        self.populate(&key, &entity, self.policy.entity_ttl).await;
        Ok(entity)
    }

    // == Read All ==
    /// Returns the `<kind>:all` snapshot when cached, otherwise lists the
    /// store and caches the result for `collection_ttl`.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn read_all(&self) -> Result<Vec<E>> {
        let key = keys::collection(E::KIND);

        if let Some(entities) = self.cached::<Vec<E>>(&key).await {
            return Ok(entities);
        }

        self.stats.record_store_read();
        let entities = self
            .records
            .list_all()
            .await
            .map_err(|err| self.store_failure(err))?;

        self.populate(&key, &entities, self.policy.collection_ttl).await;
        Ok(entities)
    }

    // == Create ==
    /// Persists a new entity and caches it under `<kind>:<id>` (plus the
    /// lookaside slot for kinds with a unique field).
    ///
    /// Both conflict routes, the lookaside hit and the store constraint,
    /// report `Conflict`. The `<kind>:all` snapshot is left as is.
    #[instrument(skip(self, draft), fields(kind = E::KIND))]
    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        let lookaside_key = E::unique_key(&draft)
            .map(|unique| keys::lookaside(E::KIND, unique.field, &unique.value));

        if let Some(key) = &lookaside_key {
            match self.cache.get(key).await {
                Ok(Some(_)) => {
                    self.stats.record_lookaside_conflict();
                    debug!(key = %key, "Lookaside hit, rejecting create");
                    return Err(self.conflict());
                }
                Ok(None) => {}
                Err(err) => {
                    self.stats.record_cache_error();
                    warn!(key = %key, error = %err, "Lookaside check failed, deferring to store");
                }
            }
        }

        let entity = match self.records.create(draft).await {
            Ok(entity) => entity,
            Err(StoreError::ConstraintViolation(msg)) => {
                self.stats.record_store_conflict();
                debug!(reason = %msg, "Store rejected duplicate");
                return Err(self.conflict());
            }
            Err(err) => return Err(self.store_failure(err)),
        };

        self.populate(
            &keys::entity(E::KIND, entity.id()),
            &entity,
            self.policy.entity_ttl,
        )
        .await;

        if let Some(key) = &lookaside_key {
            self.populate(key, &entity, self.policy.lookaside_ttl).await;
        }

        Ok(entity)
    }

    // == Internals ==
    /// Cached value under `key`. Failures and undecodable payloads count as
    /// misses so the caller falls back to the store.
    async fn cached<T>(&self, key: &str) -> Option<T>
    where
        C: EntityCodec<T>,
    {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                self.stats.record_miss();
                debug!(key = key, "Cache miss");
                return None;
            }
            Err(err) => {
                self.stats.record_cache_error();
                self.stats.record_miss();
                warn!(key = key, error = %err, "Cache read failed, falling back to store");
                return None;
            }
        };

        match <C as EntityCodec<T>>::decode(&self.codec, &payload) {
            Ok(value) => {
                self.stats.record_hit();
                debug!(key = key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                self.stats.record_cache_error();
                self.stats.record_miss();
                warn!(key = key, error = %err, "Undecodable cache payload, falling back to store");
                None
            }
        }
    }

    /// Best-effort `set_with_ttl`. A failure is logged and counted, never returned.
    async fn populate<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        C: EntityCodec<T>,
    {
        let payload = match <C as EntityCodec<T>>::encode(&self.codec, value) {
            Ok(payload) => payload,
            Err(err) => {
                self.stats.record_populate_failure();
                warn!(key = key, error = %err, "Could not encode cache payload");
                return;
            }
        };

        match self.cache.set_with_ttl(key, payload, ttl).await {
            Ok(()) => debug!(key = key, ttl_ms = ttl.as_millis() as u64, "Cache populated"),
            Err(err) => {
                self.stats.record_populate_failure();
                warn!(key = key, error = %err, "Cache populate failed");
            }
        }
    }

    fn conflict(&self) -> ServiceError {
        ServiceError::Conflict(format!("{} already exists", E::KIND))
    }

    fn store_failure(&self, err: StoreError) -> ServiceError {
        error!(kind = E::KIND, error = %err, "Record store failure");
        ServiceError::from(err)
    }
}
