//! API error types with IntoResponse
//!
//! Every failure becomes a JSON object with an `error` field, plus
//! `details` for server-side failures that carry one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::workflow::EnrollError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request body missing, malformed, or failing field checks (400)
    InvalidPayload,

    /// Enrollment workflow rejected or failed the request (400/500)
    Enroll(EnrollError),

    /// Read query failed (500, logged when rendered)
    Storage {
        error: &'static str,
        source: StoreError,
        expose_details: bool,
    },

    /// Request exceeded the server's handling deadline (408)
    Timeout,
}

impl ApiError {
    /// Storage failure whose underlying message is returned to the client.
    pub fn storage_with_details(error: &'static str, source: StoreError) -> Self {
        Self::Storage {
            error,
            source,
            expose_details: true,
        }
    }

    /// Storage failure reported without the underlying message.
    pub fn storage(error: &'static str, source: StoreError) -> Self {
        Self::Storage {
            error,
            source,
            expose_details: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidPayload => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid payload" }),
            ),
            Self::Enroll(e @ (EnrollError::InvalidStudent | EnrollError::InvalidCourse)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": e.to_string() }),
            ),
            Self::Enroll(EnrollError::Persistence(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to enroll",
                    "details": e.to_string()
                }),
            ),
            Self::Storage {
                error,
                source,
                expose_details,
            } => {
                tracing::error!("{}: {}", error, source);
                let body = if expose_details {
                    json!({ "error": error, "details": source.to_string() })
                } else {
                    json!({ "error": error })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            Self::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                json!({ "error": "Request timed out" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        tracing::debug!("Payload rejected: {}", e);
        Self::InvalidPayload
    }
}

impl From<EnrollError> for ApiError {
    fn from(e: EnrollError) -> Self {
        Self::Enroll(e)
    }
}
