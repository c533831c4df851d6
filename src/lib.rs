//! Directory Cache - TTL cache-or-compute layer for the professional directory
//!
//! Shields the backing store from repeated reads of slow-changing lookup data
//! and serves it over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, CacheManager};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
