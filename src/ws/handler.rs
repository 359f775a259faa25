//! Axum WebSocket upgrade handlers.
//!
//! The connection path fixes the role before the first message flows:
//! sensors declare their device id in the path, cameras get a generated
//! session id, dashboards carry no identity at all.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::dashboard::run_dashboard;
use super::device::run_device;
use crate::app_state::AppState;
use crate::domain::{DeviceId, DeviceRole};

/// `GET /ws/sensor/{device_id}` — Upgrade a sensor connection.
pub async fn sensor_ws(
    ws: WebSocketUpgrade,
    Path(device_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let relay = state.relay.clone();
    ws.on_upgrade(move |socket| {
        run_device(socket, DeviceId::new(device_id), DeviceRole::Sensor, relay)
    })
}

/// `GET /ws/camera` — Upgrade a camera connection.
pub async fn camera_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let relay = state.relay.clone();
    ws.on_upgrade(move |socket| {
        run_device(socket, DeviceId::generated(), DeviceRole::Camera, relay)
    })
}

/// `GET /ws/dashboard` — Upgrade a dashboard subscriber connection.
pub async fn dashboard_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let events = state.relay.event_bus().subscribe();
    tracing::info!(
        subscribers = state.relay.event_bus().receiver_count(),
        "dashboard connected"
    );
    ws.on_upgrade(move |socket| run_dashboard(socket, events))
}
