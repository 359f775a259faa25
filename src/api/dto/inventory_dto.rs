//! Inventory request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::persistence::Item;

/// Request body for `PATCH /items/{name}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStockRequest {
    /// Signed stock adjustment. The resulting count is clamped at zero.
    pub delta: i64,
}

/// Response body for a successful `PATCH /items/{name}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StockAdjusted {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
    /// The full item list after the adjustment.
    pub items: Vec<Item>,
}
