//! cachefront - record services behind a cache-aside layer
//!
//! Products, users and a plain key/value endpoint, served from a durable
//! SQLite store through a TTL-bounded cache (in-memory or Redis).

pub mod api;
pub mod aside;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use aside::{CacheAside, CachePolicy};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
