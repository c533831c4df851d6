//! API Handlers
//!
//! HTTP request handlers for category lookups and cache administration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::CacheManager;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CategoriesResponse, DeleteResponse, HealthResponse, RemovedResponse, StatsResponse,
};
use crate::storage::{Category, CategorySource, InMemoryCategorySource};

/// Cache key holding the full category list
pub const CATEGORIES_KEY: &str = "categories";

/// Maximum accepted key length on the admin endpoints
pub const MAX_KEY_LENGTH: usize = 256;

/// Cache key for a single category
pub fn category_key(slug: &str) -> String {
    format!("category:{}", slug)
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache
    pub cache: Arc<CacheManager>,
    /// Backing store for category lookups
    pub categories: Arc<dyn CategorySource>,
    /// TTL for cached category lookups
    pub categories_ttl: Duration,
}

impl AppState {
    pub fn new(
        cache: Arc<CacheManager>,
        categories: Arc<dyn CategorySource>,
        categories_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            categories,
            categories_ttl,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The cache reads the system clock and the category source is the
    /// seeded in-memory store. The cleanup sweep is not started.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheManager::with_system_clock(config.cache_config());
        Self::new(
            Arc::new(cache),
            Arc::new(InMemoryCategorySource::seeded()),
            config.categories_ttl(),
        )
    }
}

/// Handler for GET /categories
///
/// Serves the category list from cache, loading it from the store on a miss.
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>> {
    let source = Arc::clone(&state.categories);
    let categories = state
        .cache
        .get_or_set_with_ttl(CATEGORIES_KEY, state.categories_ttl, || async move {
            source.list_categories().await
        })
        .await?;

    Ok(Json(CategoriesResponse::new(categories.as_ref().clone())))
}

/// Handler for GET /categories/:slug
///
/// Unknown slugs are not cached, so a category added later shows up on the
/// next request.
pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>> {
    let source = Arc::clone(&state.categories);
    let lookup = slug.clone();
    let category = state
        .cache
        .get_or_set_with_ttl(&category_key(&slug), state.categories_ttl, || async move {
            source.get_category(&lookup).await
        })
        .await?;

    Ok(Json(category.as_ref().clone()))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for DELETE /cache/keys/:key
///
/// Invalidates a single cached key.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }

    if !state.cache.delete(&key).await {
        return Err(AppError::NotFound(format!("Key not found: {}", key)));
    }

    info!(key = %key, "Cache key invalidated");
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear().await;
    Json(RemovedResponse::cleared(removed))
}

/// Handler for POST /cache/cleanup
///
/// Runs an expiry sweep immediately instead of waiting for the next tick.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.cleanup().await;
    Json(RemovedResponse::cleaned_up(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
