//! API error responses
//!
//! Every error leaves the server as `{ "success": false, "error": "..." }`.

use crate::extractor::validator::SUPPORTED_FORMATS;
use crate::utils::error::FbloaderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method not allowed. Use POST.".to_string(),
        }
    }

    /// Logs the full detail; the client gets a generic message plus the detail
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!("Internal error during resolution: {}", detail);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal server error: {}", detail),
        }
    }

    pub fn invalid_url() -> Self {
        Self::bad_request(format!(
            "Invalid Facebook video URL. Supported formats: {}",
            SUPPORTED_FORMATS.join(", ")
        ))
    }
}

impl From<FbloaderError> for ApiError {
    fn from(err: FbloaderError) -> Self {
        match err {
            FbloaderError::InvalidUrl(_) => ApiError::invalid_url(),
            FbloaderError::MissingUrl => ApiError::bad_request(err.to_string()),
            FbloaderError::Internal(detail) => ApiError::internal(detail),
            other => ApiError::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err = ApiError::from(FbloaderError::Internal("task panicked".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error: task panicked");

        let err = ApiError::from(FbloaderError::InvalidUrl("x".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Supported formats"));

        let err = ApiError::from(FbloaderError::MissingUrl);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Facebook video URL is required");
    }
}
