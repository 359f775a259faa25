//! Hub configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with defaults matching the original
//! deployment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level hub configuration.
///
/// Loaded once at startup via [`HubConfig::from_env`].
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5000`).
    pub listen_addr: SocketAddr,

    /// Path to the credential table (`{username: password}` JSON object).
    pub users_path: PathBuf,

    /// Directory holding the best-effort persistence mirrors.
    pub data_dir: PathBuf,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Milliseconds between frame-buffer samples on the video feed.
    pub stream_interval_ms: u64,
}

impl HubConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()?;

        let users_path =
            PathBuf::from(std::env::var("USERS_PATH").unwrap_or_else(|_| "users.json".to_string()));

        let data_dir =
            PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 256);
        let stream_interval_ms = parse_env("STREAM_INTERVAL_MS", 8);

        Ok(Self {
            listen_addr,
            users_path,
            data_dir,
            event_bus_capacity,
            stream_interval_ms,
        })
    }

    /// Cadence of the video-feed sampling loop.
    #[must_use]
    pub const fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
