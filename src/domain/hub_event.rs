//! Dashboard-facing events emitted on state mutations.
//!
//! Every accepted stock, mode, or actuator mutation emits a [`HubEvent`]
//! through the [`super::EventBus`]. Raw telemetry is deliberately not
//! broadcast; dashboards poll it over HTTP. Consumers are expected to
//! ignore `type` discriminators they do not recognize, so new kinds can
//! be added without breaking existing subscribers.

use serde::Serialize;

use super::ControlMode;

/// Event pushed to every connected dashboard, discriminated by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEvent {
    /// An inventory item's stock count changed.
    StockUpdate {
        /// Item name.
        item: String,
        /// Stock count after the adjustment.
        #[serde(rename = "newStock")]
        new_stock: i64,
    },

    /// The hub-authoritative control state changed.
    ModeUpdate {
        /// Mode now held by the hub.
        mode: ControlMode,
        /// Threshold now held by the hub.
        threshold: f64,
    },

    /// An actuator command was delivered to a device.
    ActuatorUpdate {
        /// The caller-supplied command payload, forwarded verbatim.
        actuator: serde_json::Value,
    },
}

impl HubEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::StockUpdate { .. } => "stock_update",
            Self::ModeUpdate { .. } => "mode_update",
            Self::ActuatorUpdate { .. } => "actuator_update",
        }
    }
}
