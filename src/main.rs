//! telehub server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use telehub::api;
use telehub::app_state::AppState;
use telehub::config::HubConfig;
use telehub::domain::{DeviceRegistry, EventBus, FrameBuffer, TelemetryCache};
use telehub::persistence::{FileStore, load_users};
use telehub::service::{InventoryService, RelayService};
use telehub::ws::handler::{camera_ws, dashboard_ws, sensor_ws};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = HubConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting telehub");

    // Load the credential table; a missing table fails every login but
    // never blocks startup.
    let users = match load_users(&config.users_path).await {
        Ok(users) => users,
        Err(error) => {
            tracing::warn!(%error, "credential table unavailable, all logins will fail");
            HashMap::new()
        }
    };

    // Build domain layer
    let store = Arc::new(FileStore::new(config.data_dir.clone()));
    let registry = Arc::new(DeviceRegistry::new());
    let telemetry = Arc::new(TelemetryCache::new());
    let frames = Arc::new(FrameBuffer::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let relay = RelayService::new(
        registry,
        telemetry,
        frames,
        event_bus.clone(),
        Arc::clone(&store),
    );
    let inventory = Arc::new(InventoryService::load(event_bus, store).await);

    // Build application state
    let app_state = AppState {
        relay,
        inventory,
        users: Arc::new(users),
        stream_interval: config.stream_interval(),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws/sensor/{device_id}", get(sensor_ws))
        .route("/ws/camera", get(camera_ws))
        .route("/ws/dashboard", get(dashboard_ws))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
