//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 5 * 60;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// TTL in milliseconds for the cached category lookups
    pub categories_ttl_ms: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Whether concurrent misses on one key share a single fetch
    pub coalesce_misses: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 1800000)
    /// - `CATEGORIES_TTL_MS` - TTL for category lookups (default: `DEFAULT_TTL_MS`)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `COALESCE_MISSES` - Share one fetch between concurrent misses (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let default_ttl_ms = env_or("DEFAULT_TTL_MS", DEFAULT_TTL_MS);
        Self {
            default_ttl_ms,
            categories_ttl_ms: env_or("CATEGORIES_TTL_MS", default_ttl_ms),
            cleanup_interval: env_or("CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL_SECS),
            coalesce_misses: env_or("COALESCE_MISSES", true),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
        }
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_millis(self.default_ttl_ms),
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
            coalesce_misses: self.coalesce_misses,
        }
    }

    pub fn categories_ttl(&self) -> Duration {
        Duration::from_millis(self.categories_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_TTL_MS,
            categories_ttl_ms: DEFAULT_TTL_MS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            coalesce_misses: true,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
