//! Inbound device message envelope.

use serde::Deserialize;

/// Text message a device sends to the hub, discriminated by `type`.
///
/// Anything that fails to parse into this envelope, or parses to a type
/// the sender's role is not allowed to emit, is logged and discarded. A
/// malformed message is never fatal to the connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceMessage {
    /// A telemetry reading: `{"type":"sensor","data":{...}}`.
    Sensor {
        /// The reading, cached wholesale without inspection.
        data: serde_json::Value,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sensor_reading() {
        let msg: Result<DeviceMessage, _> =
            serde_json::from_str(r#"{"type":"sensor","data":{"temp":22}}"#);
        let Ok(DeviceMessage::Sensor { data }) = msg else {
            panic!("expected sensor message");
        };
        assert_eq!(data, json!({"temp": 22}));
    }

    #[test]
    fn rejects_unknown_discriminator() {
        let msg: Result<DeviceMessage, _> =
            serde_json::from_str(r#"{"type":"gps","data":{"lat":0}}"#);
        assert!(msg.is_err());
    }

    #[test]
    fn rejects_missing_data_field() {
        let msg: Result<DeviceMessage, _> = serde_json::from_str(r#"{"type":"sensor"}"#);
        assert!(msg.is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let msg: Result<DeviceMessage, _> = serde_json::from_str("not json");
        assert!(msg.is_err());
    }
}
