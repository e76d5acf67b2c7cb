//! Cache Module
//!
//! The cache store contract plus its in-memory (TTL + LRU) and Redis backends.

mod entry;
mod lru;
mod redis;
mod stats;
mod store;


// Re-export public types
pub use self::redis::RedisCacheStore;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStore, MemoryCache, MemoryCacheStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
