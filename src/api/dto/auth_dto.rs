//! Login request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /login`.
///
/// Absent fields are treated as failed credentials, not as a malformed
/// request: the endpoint answers 401, never 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username to look up in the credential table.
    #[serde(default)]
    pub username: Option<String>,
    /// Plaintext password to compare.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response body for `POST /login`, identical for both outcomes apart
/// from the flag and status code.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Whether the credentials matched.
    pub success: bool,
    /// Greeting on success, fixed rejection text otherwise.
    pub message: String,
}
