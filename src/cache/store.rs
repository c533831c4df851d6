//! Cache Store Module
//!
//! Synchronous cache engine: a HashMap of TTL-stamped entries plus stats.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{duration_ms, CacheEntry, CacheStats, Clock, DEFAULT_TTL};

// == Cache Store ==
/// Key-value store with per-entry TTL and lazy expiry.
///
/// Expired entries stay in the map until a read, a delete or a cleanup pass
/// touches them.
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Activity counters
    stats: CacheStats,
    /// Time source for stamping and expiry checks
    clock: Arc<dyn Clock>,
    /// TTL used by `set`
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store reading time from `clock`.
    pub fn new(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
            default_ttl,
        }
    }

    /// Creates an empty store with the 30 minute default TTL.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(DEFAULT_TTL, clock)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value under `key` with the default TTL.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        let ttl = self.default_ttl;
        self.set_arc(key, Arc::new(value), ttl);
    }

    /// Stores a value under `key` with an explicit TTL.
    pub fn set_with_ttl<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<String>,
        value: T,
        ttl: Duration,
    ) {
        self.set_arc(key, Arc::new(value), ttl);
    }

    /// Stores an already shared value.
    ///
    /// Overwrites any existing entry and restarts its TTL from now.
    pub fn set_arc<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<String>,
        value: Arc<T>,
        ttl: Duration,
    ) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), duration_ms(ttl));
        self.entries.insert(key.into(), entry);

        self.stats.record_set();
        self.stats.set_size(self.entries.len());
    }

    // == Get ==
    /// Retrieves the value stored under `key` as a `T`.
    ///
    /// Expired entries are removed and counted as a miss and a delete.
    /// An entry stored under a different type is a miss and is left in place.
    pub fn get<T: Send + Sync + 'static>(&mut self, key: &str) -> Option<Arc<T>> {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.entries.remove(key);
            self.stats.record_deletes(1);
            self.stats.set_size(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        match entry.downcast::<T>() {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns a valid `T` under `key` without touching stats or evicting.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(CacheEntry::downcast::<T>)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.stats.record_deletes(1);
        self.stats.set_size(self.entries.len());
        true
    }

    // == Clear ==
    /// Removes every entry, counting each as a delete.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.record_deletes(removed);
        self.stats.set_size(0);
        removed
    }

    // == Cleanup ==
    /// Removes all entries whose TTL has elapsed.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.entries.len();
        self.stats.record_deletes(removed);
        self.stats.set_size(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of entries, expired ones included until evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn test_store() -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = CacheStore::with_clock(clock.clone());
        (store, clock)
    }

    fn categories() -> Vec<String> {
        (1..=12).map(|i| format!("category-{i}")).collect()
    }

    #[test]
    fn test_store_new() {
        let (store, _) = test_store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), Duration::from_millis(1_800_000));
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = test_store();

        store.set("key1", "value1".to_string());
        let value = store.get::<String>("key1").unwrap();

        assert_eq!(value.as_str(), "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = test_store();

        assert!(store.get::<String>("nonexistent").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_get_wrong_type_is_miss() {
        let (mut store, _) = test_store();
        store.set("count", 7u64);

        assert!(store.get::<String>("count").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get::<u64>("count").as_deref(), Some(&7));

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.deletes, 0);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = test_store();

        store.set("key1", "value1".to_string());
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert!(store.get::<String>("key1").is_none());
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let (mut store, _) = test_store();

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.stats().deletes, 0);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = test_store();

        store.set("key1", "value1".to_string());
        store.set("key1", "value2".to_string());

        assert_eq!(store.get::<String>("key1").unwrap().as_str(), "value2");
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 2);
    }

    #[test]
    fn test_store_overwrite_restarts_ttl() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("key1", 1u8, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));
        store.set_with_ttl("key1", 2u8, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get::<u8>("key1").as_deref(), Some(&2));
    }

    #[test]
    fn test_store_huge_ttl_does_not_expire() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("forever", 1u8, Duration::from_secs(1u64 << 62));
        clock.advance(Duration::from_millis(1));
        assert_eq!(store.get::<u8>("forever").as_deref(), Some(&1));

        clock.advance(Duration::from_secs(10 * 365 * 24 * 3600));
        assert_eq!(store.cleanup(), 0);
        assert_eq!(store.get::<u8>("forever").as_deref(), Some(&1));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("key1", "value1".to_string(), Duration::from_secs(1));
        assert!(store.get::<String>("key1").is_some());

        clock.advance(Duration::from_millis(1_000));
        assert!(store.get::<String>("key1").is_some(), "valid at exactly the TTL");

        clock.advance(Duration::from_millis(1));
        assert!(store.get::<String>("key1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_expired_get_is_not_counted_again_by_cleanup() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("key1", 1u8, Duration::from_secs(1));
        clock.advance(Duration::from_secs(2));

        assert!(store.get::<u8>("key1").is_none());
        assert_eq!(store.cleanup(), 0);
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_peek_does_not_touch_stats() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("key1", 1u8, Duration::from_secs(1));
        assert_eq!(store.peek::<u8>("key1").as_deref(), Some(&1));
        assert!(store.peek::<u16>("key1").is_none());

        clock.advance(Duration::from_secs(2));
        assert!(store.peek::<u8>("key1").is_none());
        assert_eq!(store.len(), 1, "peek must not evict");

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.deletes, 0);
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = test_store();

        store.set("a", 1u8);
        store.set("b", 2u8);
        store.set("c", 3u8);

        assert_eq!(store.clear(), 3);
        assert!(store.get::<u8>("a").is_none());
        assert!(store.get::<u8>("b").is_none());

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.deletes, 3);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("key1", "value1".to_string(), Duration::from_secs(1));
        store.set_with_ttl("key2", "value2".to_string(), Duration::from_secs(10));
        store.set_with_ttl("key3", "value3".to_string(), Duration::from_millis(500));

        clock.advance(Duration::from_millis(1_100));

        assert_eq!(store.cleanup(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().size, 1);
        assert_eq!(store.stats().deletes, 2);
        assert!(store.get::<String>("key2").is_some());
    }

    #[test]
    fn test_store_categories_scenario() {
        let (mut store, clock) = test_store();

        store.set_with_ttl("categories", categories(), Duration::from_millis(1_800_000));

        clock.advance(Duration::from_secs(60));
        let cached = store.get::<Vec<String>>("categories").unwrap();
        assert_eq!(cached.len(), 12);
        assert_eq!(*cached, categories());

        let before = store.stats();
        assert_eq!(before.hits, 1);

        clock.advance(Duration::from_millis(1_800_000));
        assert!(store.get::<Vec<String>>("categories").is_none());

        let after = store.stats();
        assert_eq!(after.misses, before.misses + 1);
        assert_eq!(after.deletes, before.deletes + 1);
        assert_eq!(after.size, 0);
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = test_store();

        store.set("key1", "value1".to_string());
        store.get::<String>("key1"); // hit
        store.get::<String>("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_rate(), 50.0);
    }
}
