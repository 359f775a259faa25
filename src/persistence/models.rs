//! Records mirrored to the JSON files under the data directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The durable mirror of the most recent sensor reading.
///
/// Written behind every cache update; never consulted on a read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReading {
    /// The reading exactly as the sensor sent it.
    pub data: serde_json::Value,
    /// Server-side write timestamp.
    pub saved_at: DateTime<Utc>,
}

/// One inventory record.
///
/// Serves double duty as the durable row in `items.json` and the wire
/// shape of `GET /items` elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item name, the lookup key for stock adjustments.
    pub name: String,
    /// Units in stock; never negative.
    pub stock: i64,
}

impl Item {
    /// Creates an item record.
    pub fn new(name: impl Into<String>, stock: i64) -> Self {
        Self {
            name: name.into(),
            stock,
        }
    }
}
