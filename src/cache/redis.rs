//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::{CacheError, CacheResult};

/// `CacheStore` backed by a Redis server.
///
/// Every command error, including a lost connection, surfaces as
/// `CacheError::Unavailable` so callers never confuse an outage with a miss.
pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    /// Creates a store for the given `redis://` URL. No connection is made yet.
    pub fn new(url: &str) -> CacheResult<Self> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Unavailable(e.to_string()))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> CacheResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

fn unavailable(err: redis::RedisError) -> CacheError {
    CacheError::Unavailable(err.to_string())
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;

        let payload = redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut conn)
            .await
            .map_err(unavailable)?;

        debug!(key = key, hit = payload.is_some(), "Redis get");
        Ok(payload)
    }

    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;

        // PX rejects 0, and a zero TTL means the slot is already gone
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("PX")
            .arg(ttl_ms)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)?;

        debug!(key = key, ttl_ms = ttl_ms, "Redis set with ttl");
        Ok(())
    }

    async fn set(&self, key: &str, payload: String) -> CacheResult<()> {
        let mut conn = self.connection().await?;

        redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)?;

        debug!(key = key, "Redis set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;

        let removed = redis::cmd("DEL")
            .arg(key)
            .query_async::<_, i64>(&mut conn)
            .await
            .map_err(unavailable)?;

        debug!(key = key, removed = removed, "Redis delete");
        Ok(removed > 0)
    }
}
