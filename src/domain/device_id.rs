//! Type-safe identifiers for devices and connections.
//!
//! [`DeviceId`] is the logical, caller-visible key a device registers
//! under ("pi-1"); [`ConnId`] identifies one physical WebSocket connection.
//! Keeping them distinct is what makes stale-close handling safe: a device
//! id can outlive many connections, a connection id never outlives one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identifier for a device.
///
/// An opaque string key, stable for the lifetime of one connection. Sensor
/// devices declare their own id on the connection path; camera devices get
/// a generated session id. Used as the dictionary key in
/// [`super::DeviceRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a `DeviceId` from a declared identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a generated session identifier (UUID v4) for devices that
    /// do not declare one.
    #[must_use]
    pub fn generated() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for one WebSocket connection.
///
/// Wraps a UUID v4 minted at upgrade time. A replaced registry entry keeps
/// working sockets apart: unregistering compares `ConnId`s, never device
/// ids alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(uuid::Uuid);

impl ConnId {
    /// Creates a new random `ConnId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn conn_ids_are_unique() {
        let a = ConnId::new();
        let b = ConnId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_device_ids_are_unique() {
        let a = DeviceId::generated();
        let b = DeviceId::generated();
        assert_ne!(a, b);
    }

    #[test]
    fn declared_id_round_trips_as_str() {
        let id = DeviceId::new("pi-1");
        assert_eq!(id.as_str(), "pi-1");
        assert_eq!(format!("{id}"), "pi-1");
    }

    #[test]
    fn device_id_serializes_transparently() {
        let id = DeviceId::new("pi-1");
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"pi-1\"");
    }

    #[test]
    fn device_id_works_as_map_key() {
        use std::collections::HashMap;
        let id = DeviceId::new("pi-1");
        let mut map = HashMap::new();
        map.insert(id.clone(), "entry");
        assert_eq!(map.get(&id), Some(&"entry"));
    }
}
