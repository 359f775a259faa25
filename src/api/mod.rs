//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Paths match the original dashboard protocol: `/login`, `/items`,
//! `/api/*`, and `/video_feed` are all mounted at the root.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}
