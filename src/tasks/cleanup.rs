//! TTL Cleanup Task
//!
//! Background sweep of expired entries in the in-memory cache. Reads already
//! ignore expired entries; the sweep only reclaims their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCacheStore;

/// Spawns a task that sweeps expired entries every `interval_secs` seconds.
///
/// Returns the JoinHandle so the caller can abort the task on shutdown.
pub fn spawn_cleanup_task(cache: Arc<MemoryCacheStore>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting TTL cleanup task");

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!(removed = removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
