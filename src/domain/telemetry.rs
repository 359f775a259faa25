//! Last-value cache for sensor readings and control state.
//!
//! [`TelemetryCache`] is authoritative for every read the HTTP surface
//! serves; the durable mirror written behind it is best-effort and never
//! consulted on the read path. Values survive device disconnects: the
//! cache belongs to the hub, not to any connection.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Control mode a device can be driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Actuators move only on explicit commands.
    Manual,
    /// The device acts on its own readings against the threshold.
    Auto,
}

impl ControlMode {
    /// Parses a wire-format mode string. Returns `None` for anything other
    /// than `"manual"` or `"auto"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Hub-authoritative control settings.
///
/// `device_synced` records whether the most recent mode push reached the
/// device; the hub and the device may diverge until the device reconnects,
/// and this flag is how that divergence stays visible instead of silent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Current control mode.
    pub mode: ControlMode,
    /// Current threshold.
    pub threshold: f64,
    /// Whether the latest mode push was delivered to the device.
    pub device_synced: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            mode: ControlMode::Manual,
            threshold: 30.0,
            device_synced: true,
        }
    }
}

/// Last-value cache for the most recent sensor reading and control state.
///
/// # Concurrency
///
/// Both cells are independent [`RwLock`]s: readers never contend with each
/// other, and a writer holds its lock only for the duration of a value
/// swap. Readings are overwritten wholesale, never merged field by field.
#[derive(Debug)]
pub struct TelemetryCache {
    reading: RwLock<serde_json::Value>,
    control: RwLock<ControlState>,
}

impl TelemetryCache {
    /// Creates a cache with an empty reading and default control state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reading: RwLock::new(serde_json::Value::Object(serde_json::Map::new())),
            control: RwLock::new(ControlState::default()),
        }
    }

    /// Unconditionally overwrites the cached reading.
    pub async fn set_reading(&self, value: serde_json::Value) {
        *self.reading.write().await = value;
    }

    /// Returns the cached reading, or an empty object if no reading has
    /// ever arrived. Never waits for a first value.
    pub async fn reading(&self) -> serde_json::Value {
        self.reading.read().await.clone()
    }

    /// Applies a partial control update and returns the resulting state.
    ///
    /// Omitted fields keep their current value. The update is applied
    /// under a single write lock, so concurrent partial updates never
    /// interleave half-applied.
    pub async fn set_control(
        &self,
        mode: Option<ControlMode>,
        threshold: Option<f64>,
    ) -> ControlState {
        let mut state = self.control.write().await;
        if let Some(mode) = mode {
            state.mode = mode;
        }
        if let Some(threshold) = threshold {
            state.threshold = threshold;
        }
        *state
    }

    /// Returns the current control state.
    pub async fn control(&self) -> ControlState {
        *self.control.read().await
    }

    /// Records whether the latest mode push reached the device.
    pub async fn mark_device_sync(&self, synced: bool) {
        self.control.write().await.device_synced = synced;
    }
}

impl Default for TelemetryCache {
    fn default() -> Self {
        Self::new()
    }
}
