//! Broadcast channel fanning dashboard events out to subscribers.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every accepted
//! state mutation publishes a [`HubEvent`] through the bus; each dashboard
//! connection holds one receiver. The event is serialized exactly once per
//! publish, and every receiver gets a cheap [`PushMessage`] clone.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::HubEvent;

/// A [`HubEvent`] serialized once for fan-out.
///
/// Cloning bumps the `Arc`, so a publish to N subscribers costs one
/// serialization however large N is. `kind` carries the discriminator for
/// logging without re-parsing the payload.
#[derive(Debug, Clone)]
pub struct PushMessage {
    /// Event type discriminator (`stock_update`, `mode_update`, ...).
    pub kind: &'static str,
    /// The full event as a JSON text payload.
    pub json: Arc<str>,
}

/// Broadcast bus for dashboard push events.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest messages are dropped for
/// lagging receivers; each receiver still observes the messages it does
/// get in publish order. A slow or dead subscriber never affects delivery
/// to the others.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PushMessage>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Serializes the event once and publishes it to all subscribers.
    ///
    /// Returns the number of receivers the message reached. With no active
    /// subscribers the event is silently dropped and 0 is returned.
    pub fn publish(&self, event: &HubEvent) -> usize {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(error) => {
                tracing::error!(kind = event.event_type_str(), %error, "event serialization failed");
                return 0;
            }
        };
        let message = PushMessage {
            kind: event.event_type_str(),
            json: Arc::from(json),
        };
        self.sender.send(message).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future pushes.
    ///
    /// Each dashboard connection calls this once on connect; dropping the
    /// receiver is how a subscriber leaves the set.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PushMessage> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
