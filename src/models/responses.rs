//! Response DTOs for the service API
//!
//! Entities are returned as-is; these cover the key/value endpoint and the
//! operational routes.

use serde::Serialize;

use crate::aside::AsideStatsSnapshot;
use crate::cache::CacheStats;

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Confirmation body for key/value writes and deletes
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn set(key: &str, value: &str) -> Self {
        Self {
            message: format!("Key {} set with value {}", key, value),
        }
    }

    pub fn deleted(key: &str) -> Self {
        Self {
            message: format!("Key {} deleted", key),
        }
    }

    pub fn welcome() -> Self {
        Self {
            message: "Welcome to the cachefront record services".to_string(),
        }
    }
}

/// Response body for GET /time
#[derive(Debug, Clone, Serialize)]
pub struct TimeResponse {
    /// Unix time in fractional seconds
    pub time: f64,
}

impl TimeResponse {
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self {
            time: now.timestamp_millis() as f64 / 1000.0,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub products: AsideStatsSnapshot,
    pub users: AsideStatsSnapshot,
    /// Present only with the in-memory cache backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_cache: Option<MemoryCacheStatsResponse>,
}

/// In-memory backend counters plus derived hit rate
#[derive(Debug, Clone, Serialize)]
pub struct MemoryCacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for MemoryCacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_wording() {
        assert_eq!(MessageResponse::set("k", "v").message, "Key k set with value v");
        assert_eq!(MessageResponse::deleted("k").message, "Key k deleted");
    }

    #[test]
    fn test_memory_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = MemoryCacheStatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_time_response_is_recent() {
        let resp = TimeResponse::now();
        assert!(resp.time > 1_600_000_000.0);
    }
}
