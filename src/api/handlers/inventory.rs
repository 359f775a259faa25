//! Inventory handlers: list items, adjust stock.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{AdjustStockRequest, StockAdjusted};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, HubError};
use crate::persistence::Item;

/// `GET /items` — List all inventory items.
#[utoipa::path(
    get,
    path = "/items",
    tag = "Inventory",
    summary = "List items",
    description = "Returns every inventory record with its current stock count.",
    responses(
        (status = 200, description = "All items", body = Vec<Item>),
    )
)]
pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.inventory.list().await)
}

/// `PATCH /items/{name}` — Adjust an item's stock by a signed delta.
///
/// # Errors
///
/// Returns [`HubError::ItemNotFound`] when no item has that name.
#[utoipa::path(
    patch,
    path = "/items/{name}",
    tag = "Inventory",
    summary = "Adjust stock",
    description = "Applies a signed delta to the named item's stock, clamping at zero. Broadcasts a stock_update to every dashboard.",
    params(("name" = String, Path, description = "Item name")),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = StockAdjusted),
        (status = 404, description = "No such item", body = ErrorResponse),
    )
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<impl IntoResponse, HubError> {
    let items = state.inventory.adjust(&name, req.delta).await?;
    Ok(Json(StockAdjusted {
        success: true,
        items,
    }))
}

/// Inventory routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/{name}", patch(adjust_stock))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::app_state::test_support::make_state;

    #[tokio::test]
    async fn list_returns_the_seed() {
        let app = super::routes().with_state(make_state().await);
        let request = Request::get("/items").body(Body::empty()).ok();
        let Some(request) = request else {
            panic!("request build failed");
        };
        let response = app.oneshot(request).await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        let Ok(bytes) = bytes else {
            panic!("body read failed");
        };
        let items: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
        assert_eq!(
            items,
            json!([
                {"name": "Laptop", "stock": 10},
                {"name": "Keyboard", "stock": 15},
                {"name": "Mouse", "stock": 5},
            ])
        );
    }

    #[tokio::test]
    async fn patch_adjusts_and_returns_all_items() {
        let app = super::routes().with_state(make_state().await);
        let request = Request::patch("/items/Laptop")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"delta":-1}"#))
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };
        let response = app.oneshot(request).await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        let Ok(bytes) = bytes else {
            panic!("body read failed");
        };
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
        assert_eq!(body.get("success"), Some(&json!(true)));
        let Some(items) = body.get("items").and_then(|v| v.as_array()) else {
            panic!("items missing from response");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items.first(), Some(&json!({"name": "Laptop", "stock": 9})));
    }

    #[tokio::test]
    async fn patch_on_unknown_item_is_not_found() {
        let app = super::routes().with_state(make_state().await);
        let request = Request::patch("/items/Monitor")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"delta":1}"#))
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };
        let response = app.oneshot(request).await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
