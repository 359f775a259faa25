//! Relay service: routes device traffic and control requests, emits events.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::domain::{
    ConnId, ControlMode, ControlState, Delivery, DeviceCommand, DeviceHandle, DeviceId,
    DeviceRegistry, DeviceRole, EventBus, FrameBuffer, HubEvent, TelemetryCache,
};
use crate::error::HubError;
use crate::persistence::FileStore;

/// Result of a mode update.
///
/// The cache mutation and the device delivery are separate outcomes on
/// purpose: an undelivered push leaves the new state in force, and the
/// divergence is reported instead of rolled back.
#[derive(Debug, Clone, Copy)]
pub struct ModeOutcome {
    /// Hub-authoritative control state after the update.
    pub state: ControlState,
    /// Whether the state push reached the device.
    pub delivered: bool,
}

/// Orchestration layer for device connections and control requests.
///
/// Sole owner of mutation rights over [`DeviceRegistry`],
/// [`TelemetryCache`], and [`FrameBuffer`]: every inbound device message
/// and every HTTP control request flows through a method here. Mutation
/// methods follow the pattern: update state → attempt delivery → emit
/// events → return outcome.
#[derive(Debug, Clone)]
pub struct RelayService {
    registry: Arc<DeviceRegistry>,
    telemetry: Arc<TelemetryCache>,
    frames: Arc<FrameBuffer>,
    event_bus: EventBus,
    store: Arc<FileStore>,
}

impl RelayService {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(
        registry: Arc<DeviceRegistry>,
        telemetry: Arc<TelemetryCache>,
        frames: Arc<FrameBuffer>,
        event_bus: EventBus,
        store: Arc<FileStore>,
    ) -> Self {
        Self {
            registry,
            telemetry,
            frames,
            event_bus,
            store,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`DeviceRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`TelemetryCache`].
    #[must_use]
    pub fn telemetry(&self) -> &Arc<TelemetryCache> {
        &self.telemetry
    }

    /// Returns a reference to the inner [`FrameBuffer`].
    #[must_use]
    pub fn frames(&self) -> &Arc<FrameBuffer> {
        &self.frames
    }

    /// Registers a freshly upgraded device connection and returns the
    /// connection id its close event must present.
    ///
    /// Always succeeds. A connection already registered under the same id
    /// is superseded: it drops out of lookups immediately but its socket
    /// stays open until its own close fires.
    pub async fn device_connected(
        &self,
        id: DeviceId,
        role: DeviceRole,
        sender: mpsc::UnboundedSender<DeviceCommand>,
    ) -> ConnId {
        let conn_id = ConnId::new();
        let handle = DeviceHandle {
            conn_id,
            role,
            sender,
        };
        let replaced = self.registry.register(id.clone(), handle).await;
        if let Some(old) = replaced {
            tracing::info!(device = %id, superseded = %old.conn_id, "device reconnected, previous connection superseded");
        }
        tracing::info!(device = %id, %conn_id, %role, "device connected");
        conn_id
    }

    /// Cleans up after a device connection closed.
    ///
    /// The unregister only takes effect when `conn_id` still owns the
    /// registry entry, so a stale close never evicts a replacement. A
    /// closing camera always empties the frame buffer: frames are not
    /// meaningful once their source is gone.
    pub async fn device_closed(&self, id: &DeviceId, conn_id: ConnId, role: DeviceRole) {
        let removed = self.registry.unregister(id, conn_id).await;
        if role == DeviceRole::Camera {
            self.frames.clear().await;
        }
        tracing::info!(device = %id, %conn_id, %role, removed, "device disconnected");
    }

    /// Caches a sensor reading and mirrors it behind the call.
    ///
    /// The mirror write is fire-and-forget: a failure is logged and never
    /// reaches the device connection. Raw telemetry is not broadcast to
    /// dashboards; it stays pull-only over HTTP. A push event for readings
    /// would be published from here if that ever changes.
    pub async fn ingest_reading(&self, id: &DeviceId, data: serde_json::Value) {
        self.telemetry.set_reading(data.clone()).await;
        tracing::debug!(device = %id, "reading cached");

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(error) = store.save_reading(&data).await {
                tracing::warn!(%error, "telemetry mirror write failed");
            }
        });
    }

    /// Buffers the latest camera frame.
    pub async fn ingest_frame(&self, frame: Bytes) {
        tracing::trace!(len = frame.len(), "frame buffered");
        self.frames.set_frame(frame).await;
    }

    /// Forwards an actuator payload to a device.
    ///
    /// Delivered commands are echoed to every dashboard as an
    /// `actuator_update`; an undelivered command is terminal and emits
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DeviceUnavailable`] when no live connection
    /// accepted the command.
    pub async fn send_command(
        &self,
        id: &DeviceId,
        payload: serde_json::Value,
    ) -> Result<(), HubError> {
        let delivery = self
            .registry
            .send_to(
                id,
                DeviceCommand::Command {
                    data: payload.clone(),
                },
            )
            .await;
        match delivery {
            Delivery::Delivered => {
                tracing::info!(device = %id, "command delivered");
                let _ = self
                    .event_bus
                    .publish(&HubEvent::ActuatorUpdate { actuator: payload });
                Ok(())
            }
            Delivery::Undelivered => {
                tracing::warn!(device = %id, "command undelivered");
                Err(HubError::DeviceUnavailable(id.to_string()))
            }
        }
    }

    /// Applies a partial control update and pushes the result to the
    /// device.
    ///
    /// The cache update always sticks, and the resulting state is
    /// broadcast as a `mode_update` whether or not the device push landed.
    /// The delivery outcome is recorded on the control state and returned
    /// so the caller can surface the divergence.
    pub async fn set_mode(
        &self,
        id: &DeviceId,
        mode: Option<ControlMode>,
        threshold: Option<f64>,
    ) -> ModeOutcome {
        let state = self.telemetry.set_control(mode, threshold).await;

        let delivery = self
            .registry
            .send_to(
                id,
                DeviceCommand::Mode {
                    mode: state.mode,
                    threshold: state.threshold,
                },
            )
            .await;
        let delivered = delivery.is_delivered();
        self.telemetry.mark_device_sync(delivered).await;

        let _ = self.event_bus.publish(&HubEvent::ModeUpdate {
            mode: state.mode,
            threshold: state.threshold,
        });

        if delivered {
            tracing::info!(device = %id, mode = %state.mode, threshold = state.threshold, "mode pushed");
        } else {
            tracing::warn!(device = %id, mode = %state.mode, "mode cached but not delivered");
        }

        let state = self.telemetry.control().await;
        ModeOutcome { state, delivered }
    }
}
