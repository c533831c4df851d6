//! API Module
//!
//! HTTP handlers and routing for the directory lookup and cache admin API.
//!
//! # Endpoints
//! - `GET /categories` - List categories through the cache
//! - `GET /categories/:slug` - Get one category through the cache
//! - `GET /cache/stats` - Get cache statistics
//! - `DELETE /cache/keys/:key` - Invalidate a cached key
//! - `DELETE /cache` - Clear the cache
//! - `POST /cache/cleanup` - Run an expiry sweep now
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
