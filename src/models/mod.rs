//! Response models for the directory cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    CategoriesResponse, DeleteResponse, ErrorResponse, HealthResponse, RemovedResponse,
    StatsResponse,
};
