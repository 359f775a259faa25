//! Device-side types: role, registry handle, and outbound commands.

use serde::Serialize;
use tokio::sync::mpsc;

use super::{ConnId, ControlMode};

/// Role a device declares at connection time, fixed by the route it
/// connects on. Immutable for the connection's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    /// Reports structured telemetry readings as JSON text messages.
    Sensor,
    /// Streams raw binary frames.
    Camera,
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensor => write!(f, "sensor"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

/// Message relayed from the hub to a device over its command channel.
///
/// Serialized onto the device socket as a discriminated JSON object:
/// `{"type":"mode","mode":"auto","threshold":30.0}` or
/// `{"type":"command","data":{...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceCommand {
    /// Push the full resulting control state to the device.
    Mode {
        /// Control mode the hub now holds.
        mode: ControlMode,
        /// Threshold the hub now holds.
        threshold: f64,
    },
    /// Forward an actuator payload verbatim.
    Command {
        /// Opaque caller-supplied payload.
        data: serde_json::Value,
    },
}

/// Outcome of a send attempt toward a device.
///
/// `Undelivered` covers both "no registration for the id" and "registered
/// channel closed at send time". Terminal either way; sends are never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The command was handed to the device connection task.
    Delivered,
    /// No live connection accepted the command.
    Undelivered,
}

impl Delivery {
    /// Returns `true` for [`Delivery::Delivered`].
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Registry entry for one active device connection.
///
/// The connection task owns the socket; the handle only holds the channel
/// into that task, so sends never touch the socket while registry locks
/// are held.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    /// Identifies the physical connection this handle belongs to.
    pub conn_id: ConnId,
    /// Role fixed at connection time.
    pub role: DeviceRole,
    /// Channel into the connection task.
    pub sender: mpsc::UnboundedSender<DeviceCommand>,
}

impl DeviceHandle {
    /// Hands a command to the connection task.
    ///
    /// Returns [`Delivery::Undelivered`] when the task has already dropped
    /// its receiver (connection closed or superseded).
    pub fn deliver(&self, command: DeviceCommand) -> Delivery {
        match self.sender.send(command) {
            Ok(()) => Delivery::Delivered,
            Err(_) => Delivery::Undelivered,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mode_command_wire_shape() {
        let cmd = DeviceCommand::Mode {
            mode: ControlMode::Auto,
            threshold: 30.0,
        };
        let value = serde_json::to_value(&cmd).ok();
        let Some(value) = value else {
            panic!("serialization failed");
        };
        assert_eq!(value, json!({"type": "mode", "mode": "auto", "threshold": 30.0}));
    }

    #[test]
    fn actuator_command_wire_shape() {
        let cmd = DeviceCommand::Command {
            data: json!({"actuator": "fan", "on": true}),
        };
        let value = serde_json::to_value(&cmd).ok();
        let Some(value) = value else {
            panic!("serialization failed");
        };
        assert_eq!(
            value,
            json!({"type": "command", "data": {"actuator": "fan", "on": true}})
        );
    }

    #[test]
    fn deliver_to_closed_channel_is_undelivered() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = DeviceHandle {
            conn_id: ConnId::new(),
            role: DeviceRole::Sensor,
            sender: tx,
        };
        drop(rx);
        let outcome = handle.deliver(DeviceCommand::Command { data: json!({}) });
        assert_eq!(outcome, Delivery::Undelivered);
        assert!(!outcome.is_delivered());
    }

    #[tokio::test]
    async fn deliver_to_open_channel_reaches_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = DeviceHandle {
            conn_id: ConnId::new(),
            role: DeviceRole::Camera,
            sender: tx,
        };
        let outcome = handle.deliver(DeviceCommand::Mode {
            mode: ControlMode::Manual,
            threshold: 25.0,
        });
        assert!(outcome.is_delivered());
        let received = rx.recv().await;
        let Some(DeviceCommand::Mode { mode, threshold }) = received else {
            panic!("expected mode command");
        };
        assert_eq!(mode, ControlMode::Manual);
        assert!((threshold - 25.0).abs() < f64::EPSILON);
    }
}
