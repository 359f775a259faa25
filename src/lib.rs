//! # telehub
//!
//! Relay hub connecting embedded sensor/camera devices, a backend
//! authority, and live dashboards over WebSocket and HTTP.
//!
//! The hub accepts inbound telemetry and binary frames, caches the latest
//! of each, fans control commands out to the right device, and pushes
//! change notifications to every subscribed dashboard. Any party may
//! connect, disconnect, or reconnect at any time without costing the hub
//! liveness.
//!
//! ## Architecture
//!
//! ```text
//! Devices (WS)          Dashboards (HTTP, WS)
//!     │                      │
//!     ├── WS device tasks    ├── REST handlers (api/)
//!     │   (ws/)              ├── WS dashboard tasks (ws/)
//!     │                      │
//!     ├── RelayService ──────┤   InventoryService (service/)
//!     │                      │
//!     ├── DeviceRegistry     ├── EventBus (domain/)
//!     ├── TelemetryCache     │
//!     ├── FrameBuffer        │
//!     │                      │
//!     └── FileStore mirrors (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
