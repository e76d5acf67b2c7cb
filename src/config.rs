//! Configuration Module
//!
//! Handles loading server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::aside::CachePolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// sqlx SQLite URL of the record store
    pub database_url: String,
    /// `redis://` URL; None selects the in-memory cache
    pub cache_url: Option<String>,
    /// Capacity of the in-memory cache
    pub max_entries: usize,
    /// In-memory cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Per-id entry TTL in seconds
    pub entity_ttl: u64,
    /// Collection snapshot TTL in seconds
    pub collection_ttl: u64,
    /// Uniqueness lookaside TTL in seconds
    pub lookaside_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_URL` - record store URL (default: `sqlite://cachefront.db`)
    /// - `CACHE_URL` - Redis URL; unset or empty uses the in-memory cache
    /// - `MAX_ENTRIES` - in-memory cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 1)
    /// - `ENTITY_TTL` - per-id TTL in seconds (default: 300)
    /// - `COLLECTION_TTL` - listing TTL in seconds (default: 60)
    /// - `LOOKASIDE_TTL` - uniqueness lookaside TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            cache_url: env::var("CACHE_URL").ok().filter(|url| !url.is_empty()),
            max_entries: parsed("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parsed("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            entity_ttl: parsed("ENTITY_TTL").unwrap_or(defaults.entity_ttl),
            collection_ttl: parsed("COLLECTION_TTL").unwrap_or(defaults.collection_ttl),
            lookaside_ttl: parsed("LOOKASIDE_TTL").unwrap_or(defaults.lookaside_ttl),
        }
    }

    /// TTLs for the orchestrators.
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            entity_ttl: Duration::from_secs(self.entity_ttl),
            collection_ttl: Duration::from_secs(self.collection_ttl),
            lookaside_ttl: Duration::from_secs(self.lookaside_ttl),
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: "sqlite://cachefront.db".to_string(),
            cache_url: None,
            max_entries: 10_000,
            cleanup_interval: 1,
            entity_ttl: 300,
            collection_ttl: 60,
            lookaside_ttl: 300,
        }
    }
}
