//! Concurrent device connection storage.
//!
//! [`DeviceRegistry`] maps a logical [`DeviceId`] to the [`DeviceHandle`]
//! of its single active connection. Registration replaces, never stacks:
//! at most one live connection is reachable per identifier at any instant.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::device::{Delivery, DeviceCommand, DeviceHandle};
use super::{ConnId, DeviceId};

/// Central store mapping device identifiers to their active connections.
///
/// # Concurrency
///
/// - Lookups take the read lock and clone the handle out; the send itself
///   happens after the lock is released.
/// - A device vanishing between lookup and send is a normal
///   [`Delivery::Undelivered`], not an error.
/// - Register/unregister serialize on the write lock; both are O(1) map
///   operations, so no I/O ever happens under the lock.
#[derive(Debug)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, DeviceHandle>>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces the mapping for `id`. Always succeeds.
    ///
    /// Returns the handle that was replaced, if any. The superseded
    /// connection becomes unreachable via [`lookup`](Self::lookup) but its
    /// socket stays open until its own close event fires.
    pub async fn register(&self, id: DeviceId, handle: DeviceHandle) -> Option<DeviceHandle> {
        self.devices.write().await.insert(id, handle)
    }

    /// Removes the mapping for `id` only when the registered connection is
    /// the one invoking the unregister.
    ///
    /// A close event from a connection that has already been replaced must
    /// not evict its successor, so the caller proves ownership with the
    /// `conn_id` it was minted at upgrade time. Returns `true` when the
    /// mapping was removed.
    pub async fn unregister(&self, id: &DeviceId, conn_id: ConnId) -> bool {
        let mut map = self.devices.write().await;
        match map.get(id) {
            Some(handle) if handle.conn_id == conn_id => {
                map.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Returns a clone of the handle registered under `id`, if any.
    pub async fn lookup(&self, id: &DeviceId) -> Option<DeviceHandle> {
        self.devices.read().await.get(id).cloned()
    }

    /// Looks up `id` and attempts a single send.
    ///
    /// Returns [`Delivery::Undelivered`] when no mapping exists or the
    /// registered channel is closed at send time. Never blocks on the
    /// target and never retries; the handle is cloned out so the send
    /// happens with the registry lock already released.
    pub async fn send_to(&self, id: &DeviceId, command: DeviceCommand) -> Delivery {
        let handle = self.lookup(id).await;
        match handle {
            Some(handle) => handle.deliver(command),
            None => Delivery::Undelivered,
        }
    }

    /// Returns the number of registered devices.
    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Returns `true` if no device is registered.
    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::DeviceRole;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn make_handle(role: DeviceRole) -> (DeviceHandle, mpsc::UnboundedReceiver<DeviceCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = DeviceHandle {
            conn_id: ConnId::new(),
            role,
            sender: tx,
        };
        (handle, rx)
    }

    #[tokio::test]
    async fn register_replaces_previous_connection() {
        let registry = DeviceRegistry::new();
        let id = DeviceId::new("pi-1");
        let (first, _rx1) = make_handle(DeviceRole::Sensor);
        let (second, _rx2) = make_handle(DeviceRole::Sensor);
        let second_conn = second.conn_id;

        let replaced = registry.register(id.clone(), first).await;
        assert!(replaced.is_none());

        let replaced = registry.register(id.clone(), second).await;
        assert!(replaced.is_some());

        let found = registry.lookup(&id).await;
        let Some(found) = found else {
            panic!("expected registered handle");
        };
        assert_eq!(found.conn_id, second_conn);
    }

    #[tokio::test]
    async fn stale_unregister_is_a_no_op() {
        let registry = DeviceRegistry::new();
        let id = DeviceId::new("pi-1");
        let (first, _rx1) = make_handle(DeviceRole::Sensor);
        let (second, _rx2) = make_handle(DeviceRole::Sensor);
        let first_conn = first.conn_id;
        let second_conn = second.conn_id;

        let _ = registry.register(id.clone(), first).await;
        let _ = registry.register(id.clone(), second).await;

        // The superseded connection's close event must not evict its successor.
        assert!(!registry.unregister(&id, first_conn).await);
        assert!(registry.lookup(&id).await.is_some());

        assert!(registry.unregister(&id, second_conn).await);
        assert!(registry.lookup(&id).await.is_none());
    }

    #[tokio::test]
    async fn send_to_unknown_device_is_undelivered() {
        let registry = DeviceRegistry::new();
        let outcome = registry
            .send_to(
                &DeviceId::new("pi-1"),
                DeviceCommand::Command { data: json!({}) },
            )
            .await;
        assert_eq!(outcome, Delivery::Undelivered);
    }

    #[tokio::test]
    async fn send_to_closed_channel_is_undelivered() {
        let registry = DeviceRegistry::new();
        let id = DeviceId::new("pi-1");
        let (handle, rx) = make_handle(DeviceRole::Sensor);
        let _ = registry.register(id.clone(), handle).await;
        drop(rx);

        let outcome = registry
            .send_to(&id, DeviceCommand::Command { data: json!({}) })
            .await;
        assert_eq!(outcome, Delivery::Undelivered);
    }

    #[tokio::test]
    async fn send_to_live_device_delivers_in_order() {
        let registry = DeviceRegistry::new();
        let id = DeviceId::new("pi-1");
        let (handle, mut rx) = make_handle(DeviceRole::Sensor);
        let _ = registry.register(id.clone(), handle).await;

        let first = registry
            .send_to(&id, DeviceCommand::Command { data: json!({"seq": 1}) })
            .await;
        let second = registry
            .send_to(&id, DeviceCommand::Command { data: json!({"seq": 2}) })
            .await;
        assert!(first.is_delivered());
        assert!(second.is_delivered());

        let Some(DeviceCommand::Command { data }) = rx.recv().await else {
            panic!("expected first command");
        };
        assert_eq!(data, json!({"seq": 1}));
        let Some(DeviceCommand::Command { data }) = rx.recv().await else {
            panic!("expected second command");
        };
        assert_eq!(data, json!({"seq": 2}));
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = DeviceRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let (handle, _rx) = make_handle(DeviceRole::Camera);
        let _ = registry.register(DeviceId::new("cam"), handle).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }
}
