//! Record Store Module
//!
//! Durable, authoritative storage for entities.

mod schema;
mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::Entity;

pub use schema::bootstrap;
pub use sqlite::SqlRecordStore;

/// Durable storage for one entity kind.
///
/// Ids and creation timestamps are assigned by the store. `create` is atomic:
/// it either persists the whole row or nothing.
#[async_trait]
pub trait RecordStore<E: Entity>: Send + Sync {
    /// Persists a new entity. Fails with `ConstraintViolation` when a
    /// uniqueness constraint rejects it.
    async fn create(&self, draft: E::Draft) -> StoreResult<E>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<E>>;

    /// Every entity of the kind. Ordering is not part of the contract.
    async fn list_all(&self) -> StoreResult<Vec<E>>;
}
