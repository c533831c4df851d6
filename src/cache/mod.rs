//! Cache Module
//!
//! In-memory cache-or-compute layer with per-entry TTL expiration.

mod clock;
mod entry;
mod manager;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use clock::{duration_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use manager::{CacheConfig, CacheManager};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied when a caller does not pass one
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Interval between background expiry sweeps
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);
