//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired in-memory cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
