//! Cache Entry Module
//!
//! Defines a single type-erased cache entry with its TTL stamp.

use std::any::Any;
use std::sync::Arc;

// == Cache Entry ==
/// A stored value together with the time it was written and its TTL.
///
/// The value is held behind an `Arc` so hits hand out a shared reference
/// rather than a copy. It is type-erased so one store can hold lookups of
/// different types; callers name the type again when reading it back.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Arc<dyn Any + Send + Sync>,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Time to live in milliseconds
    pub ttl: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped at `timestamp` that lives for `ttl` milliseconds.
    pub fn new<T: Send + Sync + 'static>(data: Arc<T>, timestamp: u64, ttl: u64) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the TTL has elapsed at `now`.
    ///
    /// An entry is still valid while `now - timestamp <= ttl`, so it expires
    /// strictly after the TTL has run out. A `now` earlier than the write time
    /// counts as zero elapsed.
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in milliseconds at `now`, 0 once elapsed.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.timestamp
            .saturating_add(self.ttl)
            .saturating_sub(now)
    }

    // == Downcast ==
    /// Returns the value if it was stored as a `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.data).downcast::<T>().ok()
    }
}
