//! Domain layer: identifiers, device registry, caches, and event system.
//!
//! This module contains the hub-side domain model: device identity and
//! connection handles, the registry enforcing one live connection per
//! device, the last-value caches for telemetry and frames, and the event
//! bus broadcasting state changes to dashboards.

pub mod device;
pub mod device_id;
pub mod device_registry;
pub mod event_bus;
pub mod frame_buffer;
pub mod hub_event;
pub mod telemetry;

pub use device::{Delivery, DeviceCommand, DeviceHandle, DeviceRole};
pub use device_id::{ConnId, DeviceId};
pub use device_registry::DeviceRegistry;
pub use event_bus::{EventBus, PushMessage};
pub use frame_buffer::FrameBuffer;
pub use hub_event::HubEvent;
pub use telemetry::{ControlMode, ControlState, TelemetryCache};
