//! Cache Manager Module
//!
//! Shared, async front for the cache store: cache-or-compute lookups with
//! optional miss coalescing, and the lifecycle of the background sweep.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{
    CacheStats, CacheStore, Clock, SystemClock, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL,
};
use crate::tasks::spawn_cleanup_task;

/// Per-key gates for fetches currently in progress.
type InFlightTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

// == Cache Config ==
/// Settings for a [`CacheManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL used when a caller does not pass one
    pub default_ttl: Duration,
    /// Interval between background expiry sweeps
    pub cleanup_interval: Duration,
    /// Whether concurrent misses on one key share a single fetch
    pub coalesce_misses: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            coalesce_misses: true,
        }
    }
}

// == Cache Manager ==
/// Process-wide cache handle, constructed once and shared via `Arc`.
///
/// Reads and writes go through an async `RwLock` around a [`CacheStore`].
/// `get_or_set` is the cache-or-compute entry point: on a miss it runs the
/// caller's fetcher and stores the result. With `coalesce_misses` enabled,
/// concurrent misses on the same key wait for the fetch already in progress
/// instead of starting their own.
pub struct CacheManager {
    store: Arc<RwLock<CacheStore>>,
    in_flight: InFlightTable,
    cleanup_task: Mutex<Option<JoinHandle<()>>>,
    config: CacheConfig,
}

impl CacheManager {
    // == Constructors ==
    /// Creates a manager reading time from `clock`.
    ///
    /// The cleanup sweep is not running until [`CacheManager::start`] is called.
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let store = CacheStore::new(config.default_ttl, clock);
        Self {
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            cleanup_task: Mutex::new(None),
            config,
        }
    }

    pub fn with_system_clock(config: CacheConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Basic Operations ==
    /// Returns the value under `key` if present, unexpired and a `T`.
    pub async fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.store.write().await.get::<T>(key)
    }

    /// Stores `value` under `key` with the default TTL.
    pub async fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.store.write().await.set(key, value);
    }

    pub async fn set_with_ttl<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
        ttl: Duration,
    ) {
        self.store.write().await.set_with_ttl(key, value, ttl);
    }

    /// Removes `key`, returning whether it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Empties the cache, returning the number of entries removed.
    pub async fn clear(&self) -> usize {
        let removed = self.store.write().await.clear();
        info!("Cache cleared: removed {} entries", removed);
        removed
    }

    /// Runs one expiry sweep now, returning the number of entries removed.
    pub async fn cleanup(&self) -> usize {
        self.store.write().await.cleanup()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Get Or Set ==
    /// Returns the cached `T` under `key`, or fetches and stores it with the
    /// default TTL.
    pub async fn get_or_set<T, E, F, Fut>(&self, key: &str, fetcher: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_or_set_with_ttl(key, self.config.default_ttl, fetcher)
            .await
    }

    /// Returns the cached `T` under `key`, or fetches and stores it for `ttl`.
    ///
    /// The fetcher runs at most once per call. Its error is returned as is
    /// and nothing is cached. When misses are coalesced and the fetch this
    /// call waited on failed, this call runs its own fetcher.
    pub async fn get_or_set_with_ttl<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            return Ok(value);
        }

        if !self.config.coalesce_misses {
            return self.fetch_and_store(key, ttl, fetcher).await;
        }

        let _permit = InFlightPermit::acquire(&self.in_flight, key).await;

        let coalesced = self.store.read().await.peek::<T>(key);
        if let Some(value) = coalesced {
            debug!(key = %key, "Cache miss served by concurrent fetch");
            return Ok(value);
        }

        self.fetch_and_store(key, ttl, fetcher).await
    }

    async fn fetch_and_store<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        debug!(key = %key, "Cache miss, fetching");
        let value = Arc::new(fetcher().await?);
        self.store
            .write()
            .await
            .set_arc(key, Arc::clone(&value), ttl);
        Ok(value)
    }

    // == Lifecycle ==
    /// Starts the periodic expiry sweep.
    ///
    /// Returns `false` if a sweep is already running. Must be called from
    /// within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut task = self
            .cleanup_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *task = Some(spawn_cleanup_task(
            Arc::clone(&self.store),
            self.config.cleanup_interval,
        ));
        true
    }

    /// Stops the periodic expiry sweep, returning whether one was running.
    pub fn stop(&self) -> bool {
        let handle = self
            .cleanup_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                info!("Cache cleanup task stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.cleanup_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        let task = self
            .cleanup_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

// == In-Flight Permit ==
/// Exclusive right to fetch `key`, held for the duration of one fetch.
///
/// The gate is removed from the table when the last holder or waiter for the
/// key goes away, including when a caller's future is dropped while waiting.
struct InFlightPermit {
    table: InFlightTable,
    key: String,
    gate: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl InFlightPermit {
    async fn acquire(table: &InFlightTable, key: &str) -> Self {
        let gate = {
            let mut gates = table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(gates.entry(key.to_string()).or_default())
        };

        // Built before waiting so a dropped waiter still releases its gate
        let mut permit = Self {
            table: Arc::clone(table),
            key: key.to_string(),
            gate,
            guard: None,
        };
        permit.guard = Some(Arc::clone(&permit.gate).lock_owned().await);
        permit
    }
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.guard.take();

        let mut gates = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Table plus this permit means nobody else is waiting on the gate
        let last_holder = Arc::strong_count(&self.gate) == 2;
        let same_gate = gates
            .get(&self.key)
            .is_some_and(|gate| Arc::ptr_eq(gate, &self.gate));
        if last_holder && same_gate {
            gates.remove(&self.key);
        }
    }
}
