//! Dashboard connection task: forward broadcast pushes until disconnect.
//!
//! Dashboards are pure subscribers. Each connection holds its own
//! receiver on the event bus, so one slow or dead dashboard only ever
//! costs itself messages; delivery to every other member is unaffected.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::domain::PushMessage;

/// Runs the push-forwarding loop for a single dashboard connection.
///
/// Inbound non-close messages are ignored; nothing meaningful arrives
/// from this category. Returns when the socket closes from either end or
/// the event bus shuts down.
pub async fn run_dashboard(socket: WebSocket, mut events: broadcast::Receiver<PushMessage>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(error)) => {
                        tracing::debug!(%error, "dashboard socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            push = events.recv() => {
                match push {
                    Ok(push) => {
                        if ws_tx.send(Message::text(&*push.json)).await.is_err() {
                            tracing::debug!(kind = push.kind, "push send failed, dropping subscriber");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "dashboard lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("dashboard disconnected");
}
