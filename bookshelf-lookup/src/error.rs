//! Error types for bookshelf-lookup
//!
//! Only the request boundary can fail. Provider failures never reach this
//! layer; they are absorbed inside the adapters.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_common::api::BookInfoResponse;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    ///
    /// The detail is logged; the client receives a generic message.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Message returned to clients for any 500
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to fetch book info";

impl From<bookshelf_common::Error> for ApiError {
    fn from(err: bookshelf_common::Error) -> Self {
        match err {
            bookshelf_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(BookInfoResponse::failure(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
