//! Key/Value Endpoint
//!
//! Direct CRUD over the cache store with no backing record store and no
//! expiry. Values persist until deleted or evicted by the store itself.
//!
//! Client keys live under `kv:<key>` in the shared cache, so they can never
//! land on an orchestrator slot such as `product:1` or `user:email:<e>`.

use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheStore;
use crate::error::{Result, ServiceError};

const NAMESPACE: &str = "kv";

/// Cache key backing the client key `key`.
pub fn slot(key: &str) -> String {
    format!("{}:{}", NAMESPACE, key)
}

pub struct KvEndpoint {
    cache: Arc<dyn CacheStore>,
}

impl KvEndpoint {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// Stores `value` under `key` without expiry. Both must be non-empty.
    pub async fn create(&self, key: Option<&str>, value: Option<&str>) -> Result<()> {
        let (key, value) = match (key, value) {
            (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => (key, value),
            _ => {
                return Err(ServiceError::InvalidArgument(
                    "key and value required".to_string(),
                ))
            }
        };

        self.cache.set(&slot(key), value.to_string()).await?;
        debug!(key = key, "Key stored");
        Ok(())
    }

    pub async fn read(&self, key: &str) -> Result<String> {
        self.cache
            .get(&slot(key))
            .await?
            .ok_or_else(|| ServiceError::NotFound("Key not found".to_string()))
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        if self.cache.delete(&slot(key)).await? {
            debug!(key = key, "Key deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound("Key not found".to_string()))
        }
    }
}
