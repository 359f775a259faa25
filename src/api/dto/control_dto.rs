//! Control-plane DTOs: mode queries, mode updates, actuator commands.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/mode`.
///
/// Every field is optional at the serde layer; the handler validates the
/// shape by hand so a rejected request provably touches no state. `type`
/// must equal `"mode"` and `piId` must be present.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModeRequest {
    /// Request discriminator; only `"mode"` is accepted.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Target device identifier.
    #[serde(rename = "piId", default)]
    pub pi_id: Option<String>,
    /// New mode (`"manual"` or `"auto"`); omission keeps the current one.
    #[serde(default)]
    pub mode: Option<String>,
    /// New threshold; omission keeps the current one.
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Response body for `GET /api/mode`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModeStateResponse {
    /// Current hub-authoritative mode.
    pub mode: String,
    /// Current hub-authoritative threshold.
    pub threshold: f64,
    /// Whether the latest mode push reached the device.
    #[serde(rename = "deviceSynced")]
    pub device_synced: bool,
}

/// Response body for a successful `POST /api/mode`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModeUpdateResponse {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
    /// Resulting mode after the partial update.
    pub mode: String,
    /// Resulting threshold after the partial update.
    pub threshold: f64,
}

/// Request body for `POST /api/send-command`.
///
/// `piId` selects the target device; every other field is the opaque
/// actuator payload, forwarded to the device verbatim.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommandRequest {
    /// Target device identifier.
    #[serde(rename = "piId", default)]
    pub pi_id: Option<String>,
    /// The remaining fields of the request object.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// Response body for a successful `POST /api/send-command`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommandAccepted {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
}
