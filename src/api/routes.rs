//! API Routes
//!
//! Configures the Axum router with the lookup and cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, delete_handler, get_category_handler, health_handler,
    list_categories_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /categories` - List categories (cached)
/// - `GET /categories/:slug` - Get one category (cached)
/// - `GET /cache/stats` - Get cache statistics
/// - `DELETE /cache/keys/:key` - Invalidate a cached key
/// - `DELETE /cache` - Clear the cache
/// - `POST /cache/cleanup` - Run an expiry sweep now
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/categories", get(list_categories_handler))
        .route("/categories/:slug", get(get_category_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/cache/keys/:key", delete(delete_handler))
        .route("/cache", delete(clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
