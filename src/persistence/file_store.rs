//! JSON-file implementation of the persistence layer.
//!
//! The hub's durable state is small enough for whole-file mirrors: the
//! latest telemetry reading and the inventory list each live in one JSON
//! file under the data directory. Writes are serialized through a single
//! gate and land via write-temp-then-rename, so a crash mid-write never
//! leaves a half-written mirror behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use super::models::{Item, StoredReading};
use crate::error::HubError;

const TELEMETRY_FILE: &str = "telemetry.json";
const ITEMS_FILE: &str = "items.json";

/// File-backed persistence for the hub's best-effort mirrors.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    write_gate: Mutex<()>,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`. The directory is created on
    /// first write.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_gate: Mutex::new(()),
        }
    }

    /// Mirrors the latest sensor reading to `telemetry.json`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Persistence`] when the file cannot be written.
    /// Callers log and drop the error; the cache stays authoritative.
    pub async fn save_reading(&self, data: &serde_json::Value) -> Result<(), HubError> {
        let record = StoredReading {
            data: data.clone(),
            saved_at: Utc::now(),
        };
        self.write_json(TELEMETRY_FILE, &record).await
    }

    /// Loads the mirrored reading, or `None` when no mirror exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Persistence`] when the file exists but cannot
    /// be read or parsed.
    pub async fn load_reading(&self) -> Result<Option<StoredReading>, HubError> {
        self.read_json(TELEMETRY_FILE).await
    }

    /// Mirrors the full inventory list to `items.json`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Persistence`] when the file cannot be written.
    pub async fn save_items(&self, items: &[Item]) -> Result<(), HubError> {
        self.write_json(ITEMS_FILE, &items).await
    }

    /// Loads the mirrored inventory list, or `None` when no mirror exists.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Persistence`] when the file exists but cannot
    /// be read or parsed.
    pub async fn load_items(&self) -> Result<Option<Vec<Item>>, HubError> {
        self.read_json(ITEMS_FILE).await
    }

    /// Serializes `value` and writes it atomically under the write gate.
    async fn write_json<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<(), HubError> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| HubError::Persistence(e.to_string()))?;

        let _gate = self.write_gate.lock().await;
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| HubError::Persistence(e.to_string()))?;

        let path = self.data_dir.join(file);
        let tmp = self.data_dir.join(format!("{file}.tmp"));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| HubError::Persistence(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| HubError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Reads and parses a mirror file. A missing file is `Ok(None)`.
    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<T>, HubError> {
        let path = self.data_dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HubError::Persistence(e.to_string())),
        };
        let value =
            serde_json::from_slice(&bytes).map_err(|e| HubError::Persistence(e.to_string()))?;
        Ok(Some(value))
    }
}

/// Loads the credential table (`{username: password}`) from `path`.
///
/// # Errors
///
/// Returns [`HubError::Persistence`] when the file is missing or cannot
/// be parsed. The caller decides the fallback; the hub warns and runs
/// with an empty table so startup never depends on the file.
pub async fn load_users(path: &Path) -> Result<HashMap<String, String>, HubError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| HubError::Persistence(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| HubError::Persistence(format!("{}: {e}", path.display())))
}
