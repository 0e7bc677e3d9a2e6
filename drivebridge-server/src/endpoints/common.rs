//! Common types and utilities for API endpoints.

use std::error::Error;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use drivebridge_provider::ProviderError;
use serde::Serialize;
use thiserror::Error;

/// Error type for API operations.
///
/// Provider failures carry a caller-facing message separate from the
/// underlying error: the cause is logged server-side, the message is all the
/// caller ever sees.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete requests.
    #[error("{message}")]
    BadRequest {
        /// Caller-facing description of what was missing or malformed.
        message: &'static str,
    },

    /// A failed call to the storage provider.
    #[error("{message}")]
    Provider {
        /// The generic message serialized to the caller.
        message: &'static str,
        /// The provider error, logged but never serialized.
        #[source]
        source: ProviderError,
    },
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// The JSON envelope for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest { message } => {
                tracing::debug!("bad request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Provider { message, source } => {
                tracing::error!(
                    error = &source as &dyn Error,
                    "provider error handling request"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Fallback for requests that hit a known route with an unsupported method.
///
/// Runs before any body handling, so rejected methods never get their payload
/// parsed.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            message: "Method Not Allowed",
        }),
    )
        .into_response()
}
