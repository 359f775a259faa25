//! WebSocket layer: device and dashboard connection handling.
//!
//! Devices connect on role-specific paths (`/ws/sensor/{device_id}`,
//! `/ws/camera`) and exchange payloads with the relay; dashboards connect
//! on `/ws/dashboard` and receive every broadcast event.

pub mod dashboard;
pub mod device;
pub mod handler;
pub mod messages;
