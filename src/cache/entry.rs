//! Cache Entry Module
//!
//! Defines a single cache slot: an opaque payload plus optional expiry.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with payload and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload, opaque to the cache
    pub payload: String,
    /// When the slot was last written
    pub created_at: Instant,
    /// Absolute expiry, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `payload` - The payload to store
    /// * `ttl` - Optional time-to-live; `None` keeps the entry until deleted or evicted
    pub fn new(payload: String, ttl: Option<Duration>) -> Self {
        let now = Instant::now();

        Self {
            payload,
            created_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiry instant, so a fully elapsed TTL never yields a hit.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    #[cfg(test)]
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
