//! Device connection task: register, route messages, clean up.
//!
//! One task per device socket. The task owns the socket for its whole
//! life; the registry only ever holds the command channel into it, so a
//! replaced connection keeps draining its own socket until its close
//! event fires, then unregisters with its own connection id.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::DeviceMessage;
use crate::domain::{DeviceId, DeviceRole};
use crate::service::RelayService;

/// Runs the read/write loop for a single device connection.
///
/// - Text payloads are routed into the telemetry cache (sensor role).
/// - Binary payloads are routed into the frame buffer (camera role).
/// - Commands arriving on the registry channel are written to the socket.
///
/// Returns when the socket closes from either end; cleanup (guarded
/// unregister, camera frame clear) runs unconditionally on the way out.
pub async fn run_device(socket: WebSocket, id: DeviceId, role: DeviceRole, relay: RelayService) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
    let conn_id = relay.device_connected(id.clone(), role, cmd_tx).await;

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut commands_open = true;

    loop {
        tokio::select! {
            // Inbound payload from the device
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        route_text(&relay, &id, role, &text).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        if role == DeviceRole::Camera {
                            relay.ingest_frame(bytes).await;
                        } else {
                            tracing::debug!(device = %id, "binary payload from non-camera discarded");
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::debug!(device = %id, %error, "device socket error");
                        break;
                    }
                }
            }
            // Command relayed from an HTTP control request
            command = cmd_rx.recv(), if commands_open => {
                match command {
                    Some(command) => match serde_json::to_string(&command) {
                        Ok(json) => {
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            tracing::error!(device = %id, %error, "command serialization failed");
                        }
                    },
                    // The registry dropped this handle: a newer connection
                    // took the id. Keep draining the socket, stop polling
                    // the closed channel.
                    None => {
                        tracing::debug!(device = %id, "command channel closed, connection superseded");
                        commands_open = false;
                    }
                }
            }
        }
    }

    relay.device_closed(&id, conn_id, role).await;
}

/// Dispatches one text payload according to the sender's role.
///
/// Malformed or unrecognized payloads are logged and dropped; the
/// connection stays active.
async fn route_text(relay: &RelayService, id: &DeviceId, role: DeviceRole, text: &str) {
    if role != DeviceRole::Sensor {
        tracing::debug!(device = %id, "text payload from non-sensor discarded");
        return;
    }
    match serde_json::from_str::<DeviceMessage>(text) {
        Ok(DeviceMessage::Sensor { data }) => relay.ingest_reading(id, data).await,
        Err(error) => {
            tracing::debug!(device = %id, %error, "unrecognized device payload discarded");
        }
    }
}
