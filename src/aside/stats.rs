//! Orchestrator counters
//!
//! Lock-free counters shared by every request that goes through one
//! orchestrator. Recovered cache failures are counted here so they stay
//! observable.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct AsideStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    store_reads: AtomicU64,
    cache_errors: AtomicU64,
    populate_failures: AtomicU64,
    lookaside_conflicts: AtomicU64,
    store_conflicts: AtomicU64,
}

/// Point-in-time copy of [`AsideStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AsideStatsSnapshot {
    /// Reads answered from the cache
    pub cache_hits: u64,
    /// Reads that had to fall back to the record store
    pub cache_misses: u64,
    /// get_by_id and list_all calls reaching the record store
    pub store_reads: u64,
    /// Cache reads that failed or returned an undecodable payload
    pub cache_errors: u64,
    /// Best-effort cache writes that failed
    pub populate_failures: u64,
    /// Creates rejected by the lookaside fast path
    pub lookaside_conflicts: u64,
    /// Creates rejected by the store's uniqueness constraint
    pub store_conflicts: u64,
}

impl AsideStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_read(&self) {
        self.store_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_error(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_populate_failure(&self) {
        self.populate_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookaside_conflict(&self) {
        self.lookaside_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_conflict(&self) {
        self.store_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AsideStatsSnapshot {
        AsideStatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            store_reads: self.store_reads.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            populate_failures: self.populate_failures.load(Ordering::Relaxed),
            lookaside_conflicts: self.lookaside_conflicts.load(Ordering::Relaxed),
            store_conflicts: self.store_conflicts.load(Ordering::Relaxed),
        }
    }
}
