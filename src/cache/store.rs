//! Cache Store Module
//!
//! The `CacheStore` contract and its in-memory backend, which combines
//! HashMap slots with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store Contract ==
/// Key/value store with per-key expiry and no knowledge of entity semantics.
///
/// Operations are independent and non-transactional. `Ok(None)` from `get`
/// means the key is absent or expired; an `Err` means the backend failed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the payload stored under `key`, if any.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `payload` under `key`, expiring after `ttl`. Overwrites wholesale.
    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()>;

    /// Stores `payload` under `key` with no expiry.
    async fn set(&self, key: &str, payload: String) -> CacheResult<()>;

    /// Removes `key`, reporting whether a live value existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;
}

// == Memory Cache ==
/// Synchronous slot table behind [`MemoryCacheStore`].
#[derive(Debug)]
pub struct MemoryCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryCache {
    /// Creates an empty table holding at most `max_entries` slots.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Insert ==
    /// Stores a payload with optional TTL, overwriting any previous slot.
    ///
    /// When the table is at capacity and `key` is new, the least recently
    /// used entry is evicted first.
    pub fn insert(&mut self, key: &str, payload: String, ttl: Option<Duration>) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if payload.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::Full(
                        "Cache is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(payload, ttl));
        self.lru.touch(key);

        Ok(())
    }

    // == Lookup ==
    /// Returns the live payload for `key`. Expired entries are dropped and
    /// counted as misses.
    pub fn lookup(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.drop_slot(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let payload = entry.payload.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(payload)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes `key`; returns false when it was absent or already expired.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) => {
                let live = !entry.is_expired();
                self.drop_slot(key);
                live
            }
            None => false,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }

        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_slot(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn drop_slot(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
    }
}

// == Memory Cache Store ==
/// In-process `CacheStore` backend, safe to share behind an `Arc`.
#[derive(Debug)]
pub struct MemoryCacheStore {
    inner: RwLock<MemoryCache>,
}

impl MemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(MemoryCache::new(max_entries)),
        }
    }

    /// Sweeps expired entries. Used by the background cleanup task.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: lookups update recency and counters
        Ok(self.inner.write().await.lookup(key))
    }

    async fn set_with_ttl(&self, key: &str, payload: String, ttl: Duration) -> CacheResult<()> {
        self.inner.write().await.insert(key, payload, Some(ttl))
    }

    async fn set(&self, key: &str, payload: String) -> CacheResult<()> {
        self.inner.write().await.insert(key, payload, None)
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.inner.write().await.remove(key))
    }
}
