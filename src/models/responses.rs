//! Response DTOs for the directory cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::storage::Category;

/// Response body for GET /categories
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    /// Number of categories returned
    pub count: usize,
    pub categories: Vec<Category>,
}

impl CategoriesResponse {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            count: categories.len(),
            categories,
        }
    }
}

/// Response body for DELETE /cache/keys/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was invalidated
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for sweeps that remove entries (DELETE /cache, POST /cache/cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn cleared(removed: usize) -> Self {
        Self {
            message: format!("Cache cleared, {} entries removed", removed),
            removed,
        }
    }

    pub fn cleaned_up(removed: usize) -> Self {
        Self {
            message: format!("Cleanup complete, {} expired entries removed", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    /// Current number of entries in cache
    pub size: usize,
    /// Hit percentage rounded to two decimals
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            deletes: stats.deletes,
            size: stats.size,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::default_categories;

    #[test]
    fn test_categories_response_count() {
        let resp = CategoriesResponse::new(default_categories());
        assert_eq!(resp.count, 12);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["categories"][0]["slug"], "lawyers");
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("categories");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("categories"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_removed_response_messages() {
        assert_eq!(RemovedResponse::cleared(3).removed, 3);
        assert!(RemovedResponse::cleaned_up(0).message.contains("expired"));
    }

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            sets: 20,
            deletes: 5,
            size: 15,
        };
        let resp = StatsResponse::from(stats);
        assert_eq!(resp.hit_rate, 80.0);
        assert_eq!(resp.size, 15);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(CacheStats::new());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
