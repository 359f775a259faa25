//! Login handler: plaintext lookup against the credential table.
//!
//! Deliberately unhardened: no hashing, no rate limiting, no sessions.
//! The table lives in memory for the process lifetime; a bad credential
//! pair answers 401 with a fixed body, never 400.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, LoginResponse};
use crate::app_state::AppState;

/// `POST /login` — Check a username/password pair.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    summary = "Log in",
    description = "Compares the supplied credentials against the loaded table. Plaintext comparison only.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials matched", body = LoginResponse),
        (status = 401, description = "Credentials rejected", body = LoginResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let matched = req
        .username
        .as_ref()
        .and_then(|username| state.users.get(username))
        .is_some_and(|stored| Some(stored) == req.password.as_ref());

    if matched {
        let username = req.username.unwrap_or_default();
        tracing::info!(%username, "login accepted");
        (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: format!("Welcome, {username}!"),
            }),
        )
    } else {
        tracing::info!("login rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid username or password".to_string(),
            }),
        )
    }
}

/// Auth routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
