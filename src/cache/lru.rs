//! LRU Tracker Module
//!
//! Recency ordering for the in-memory cache's capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access recency for LRU eviction.
///
/// Every touch stamps the key with a fresh tick; the smallest tick is the
/// least recently used key. Both touch and eviction are logarithmic.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Monotonic access counter
    tick: u64,
    /// key -> last access tick
    ticks: HashMap<String, u64>,
    /// last access tick -> key, oldest first
    order: BTreeMap<u64, String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        self.tick += 1;
        if let Some(previous) = self.ticks.insert(key.to_string(), self.tick) {
            self.order.remove(&previous);
        }
        self.order.insert(self.tick, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }
}
