//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, sets, deletes and current size.

use serde::Serialize;

// == Cache Stats ==
/// Accumulated cache counters.
///
/// Counters only grow; `size` is a snapshot of the entry count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that found a valid entry
    pub hits: u64,
    /// Reads that found nothing usable (absent, expired or wrong type)
    pub misses: u64,
    /// Inserts and overwrites
    pub sets: u64,
    /// Entries removed by delete, clear or expiry
    pub deletes: u64,
    /// Current number of entries
    pub size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hit rate as a percentage rounded to two decimals.
    ///
    /// Returns 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        let percent = self.hits as f64 / total as f64 * 100.0;
        (percent * 100.0).round() / 100.0
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    /// Adds `count` removed entries to the delete counter.
    pub fn record_deletes(&mut self, count: usize) {
        self.deletes += count as u64;
    }

    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}
