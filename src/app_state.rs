//! Shared application state injected into all Axum handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::service::{InventoryService, RelayService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Every field is a handle into state constructed once at startup; there
/// are no ambient singletons anywhere in the crate.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service: device registry, caches, and control fan-out.
    pub relay: RelayService,
    /// Inventory collaborator.
    pub inventory: Arc<InventoryService>,
    /// Credential table loaded once at startup.
    pub users: Arc<HashMap<String, String>>,
    /// Cadence of the video-feed sampling loop.
    pub stream_interval: Duration,
}
