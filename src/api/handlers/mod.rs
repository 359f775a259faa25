//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod control;
pub mod inventory;
pub mod stream;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(inventory::routes())
        .merge(control::routes())
        .merge(stream::routes())
        .merge(system::routes())
}
