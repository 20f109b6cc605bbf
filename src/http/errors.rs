//! # API Errors
//!
//! Every operation returns a `Result` whose error kind is mapped to a
//! transport status code in exactly one place. 4xx responses carry
//! `status: "fail"`, 5xx responses `status: "error"`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::model::ValidationError;
use crate::store::StoreError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// A specific identifier lookup returned nothing
    #[error("No {0} found with that ID")]
    NotFound(&'static str),

    /// A write was rejected by schema validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request body could not be interpreted
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The storage layer failed
    #[error("Internal error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope status label: "fail" for client errors, "error" for
    /// server errors.
    pub fn status_label(&self) -> &'static str {
        if self.status_code().is_client_error() {
            "fail"
        } else {
            "error"
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({
            "status": self.status_label(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("tour").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidBody("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(ValidationError::new("price", "must be above 0")).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ApiError::NotFound("tour").status_label(), "fail");
        assert_eq!(
            ApiError::Store(StoreError::LockPoisoned).status_label(),
            "error"
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ApiError::NotFound("tour").to_string(),
            "No tour found with that ID"
        );
    }
}
