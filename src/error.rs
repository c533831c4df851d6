//! Error types for the directory cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::StorageError;

// == App Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Key or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing store could not serve the request
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }

        let message = match self {
            AppError::NotFound(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Unavailable(msg) => msg,
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (AppError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (AppError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (AppError::Unavailable("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should map to correct HTTP status"
            );
        }
    }

    #[test]
    fn test_from_storage_error() {
        let err: AppError = StorageError::NotFound("Category not found: x".to_string()).into();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Category not found: x"));

        let err: AppError = StorageError::Unavailable("down".to_string()).into();
        assert!(matches!(err, AppError::Unavailable(_)));
    }
}
