//! Hub error types with HTTP status code mapping.
//!
//! [`HubError`] is the central error type for the hub. Each variant maps to
//! a specific HTTP status code and structured JSON error response. No
//! variant is fatal to the process: a failed device send, a bad request, or
//! a persistence hiccup never takes the hub down for other connections.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "device not connected: pi-1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status               |
/// |-----------|-------------------|---------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request           |
/// | 2000–2999 | State / Not Found | 404 / 503                 |
/// | 3000–3999 | Server            | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Request validation failed; rejected before any state was touched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Inventory item with the given name was not found.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Target device is not registered, or its transport was already closed
    /// at send time. Terminal for the triggering call; never retried.
    #[error("device not connected: {0}")]
    DeviceUnavailable(String),

    /// Durable mirror write failed (logged by callers, never escalated).
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::ItemNotFound(_) => 2001,
            Self::DeviceUnavailable(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
