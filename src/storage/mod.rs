//! Storage Module
//!
//! Typed read access to the directory's backing data.

mod categories;

use thiserror::Error;

pub use categories::{default_categories, Category, CategorySource, InMemoryCategorySource};

// == Storage Error ==
/// Failures reported by a backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Store could not be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
