//! Control-plane handlers: telemetry query, mode query/update, commands.
//!
//! Request-shape validation happens here, before the relay is touched: a
//! rejected request provably mutates no state and broadcasts nothing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CommandAccepted, CommandRequest, ModeRequest, ModeStateResponse, ModeUpdateResponse,
};
use crate::app_state::AppState;
use crate::domain::{ControlMode, DeviceId};
use crate::error::{ErrorResponse, HubError};

/// `GET /api/sensor-data` — The most recent cached sensor reading.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    tag = "Control",
    summary = "Latest sensor reading",
    description = "Returns the cached reading verbatim, or an empty object when no reading has arrived yet. The cache survives device disconnects.",
    responses(
        (status = 200, description = "Cached reading, an opaque JSON object"),
    )
)]
pub async fn sensor_data(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.relay.telemetry().reading().await)
}

/// `GET /api/mode` — The hub-authoritative control state.
#[utoipa::path(
    get,
    path = "/api/mode",
    tag = "Control",
    summary = "Current control state",
    description = "Returns mode, threshold, and whether the latest mode push reached the device.",
    responses(
        (status = 200, description = "Control state", body = ModeStateResponse),
    )
)]
pub async fn get_mode(State(state): State<AppState>) -> impl IntoResponse {
    let control = state.relay.telemetry().control().await;
    Json(ModeStateResponse {
        mode: control.mode.to_string(),
        threshold: control.threshold,
        device_synced: control.device_synced,
    })
}

/// `POST /api/mode` — Apply a partial control update and push it to the
/// device.
///
/// The cache update and broadcast happen even when the device push fails;
/// only the response differs. See [`crate::service::RelayService::set_mode`].
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] on a malformed request shape and
/// [`HubError::DeviceUnavailable`] when the push did not reach the device.
#[utoipa::path(
    post,
    path = "/api/mode",
    tag = "Control",
    summary = "Update control state",
    description = "Partially updates mode and/or threshold, pushes the result to the device, and broadcasts a mode_update to every dashboard.",
    request_body = ModeRequest,
    responses(
        (status = 200, description = "State updated and delivered", body = ModeUpdateResponse),
        (status = 400, description = "Malformed request; no state touched", body = ErrorResponse),
        (status = 503, description = "State updated but the device is not connected", body = ErrorResponse),
    )
)]
pub async fn update_mode(
    State(state): State<AppState>,
    Json(req): Json<ModeRequest>,
) -> Result<impl IntoResponse, HubError> {
    if req.kind.as_deref() != Some("mode") {
        return Err(HubError::InvalidRequest(
            "type must be \"mode\"".to_string(),
        ));
    }
    let Some(pi_id) = req.pi_id else {
        return Err(HubError::InvalidRequest("piId is required".to_string()));
    };
    let mode = req
        .mode
        .as_deref()
        .map(|s| {
            ControlMode::parse(s)
                .ok_or_else(|| HubError::InvalidRequest(format!("unrecognized mode: {s}")))
        })
        .transpose()?;

    let outcome = state
        .relay
        .set_mode(&DeviceId::new(pi_id.as_str()), mode, req.threshold)
        .await;
    if !outcome.delivered {
        return Err(HubError::DeviceUnavailable(pi_id));
    }
    Ok(Json(ModeUpdateResponse {
        success: true,
        mode: outcome.state.mode.to_string(),
        threshold: outcome.state.threshold,
    }))
}

/// `POST /api/send-command` — Forward an actuator payload to a device.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] when `piId` is missing and
/// [`HubError::DeviceUnavailable`] when no live connection accepted the
/// command.
#[utoipa::path(
    post,
    path = "/api/send-command",
    tag = "Control",
    summary = "Send an actuator command",
    description = "Wraps the payload in a command envelope and sends it to the target device. Delivered commands are echoed to every dashboard as an actuator_update.",
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Command delivered", body = CommandAccepted),
        (status = 400, description = "piId missing", body = ErrorResponse),
        (status = 503, description = "Device not connected", body = ErrorResponse),
    )
)]
pub async fn send_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> Result<impl IntoResponse, HubError> {
    let Some(pi_id) = req.pi_id else {
        return Err(HubError::InvalidRequest("piId is required".to_string()));
    };
    let payload = serde_json::Value::Object(req.payload);
    state
        .relay
        .send_command(&DeviceId::new(pi_id), payload)
        .await?;
    Ok(Json(CommandAccepted { success: true }))
}

/// Control routes mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sensor-data", get(sensor_data))
        .route("/api/mode", get(get_mode).post(update_mode))
        .route("/api/send-command", post(send_command))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::app_state::test_support::make_state;
    use crate::app_state::AppState;
    use crate::domain::{DeviceCommand, DeviceId, DeviceRole};

    async fn send(
        state: AppState,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let app = super::routes().with_state(state);
        let response = app.oneshot(request).await;
        let Ok(response) = response else {
            panic!("request failed");
        };
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        let Ok(bytes) = bytes else {
            panic!("body read failed");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or_default();
        (status, body)
    }

    fn post_json(path: &str, body: serde_json::Value) -> Request<Body> {
        let request = Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };
        request
    }

    fn get_path(path: &str) -> Request<Body> {
        let request = Request::get(path).body(Body::empty()).ok();
        let Some(request) = request else {
            panic!("request build failed");
        };
        request
    }

    async fn connect_device(
        state: &AppState,
        id: &str,
        role: DeviceRole,
    ) -> mpsc::UnboundedReceiver<DeviceCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = state
            .relay
            .device_connected(DeviceId::new(id), role, tx)
            .await;
        rx
    }

    #[tokio::test]
    async fn sensor_data_is_empty_before_first_reading() {
        let state = make_state().await;
        let (status, body) = send(state, get_path("/api/sensor-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn sensor_data_returns_the_cached_reading() {
        let state = make_state().await;
        state
            .relay
            .ingest_reading(&DeviceId::new("pi-1"), json!({"temp": 22}))
            .await;
        let (status, body) = send(state, get_path("/api/sensor-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"temp": 22}));
    }

    #[tokio::test]
    async fn mode_defaults_are_visible() {
        let state = make_state().await;
        let (status, body) = send(state, get_path("/api/mode")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"mode": "manual", "threshold": 30.0, "deviceSynced": true})
        );
    }

    #[tokio::test]
    async fn mode_update_reaches_device_and_dashboards() {
        let state = make_state().await;
        let mut device_rx = connect_device(&state, "pi-1", DeviceRole::Sensor).await;
        let mut events = state.relay.event_bus().subscribe();

        let request = post_json(
            "/api/mode",
            json!({"type": "mode", "mode": "auto", "threshold": 30, "piId": "pi-1"}),
        );
        let (status, body) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "mode": "auto", "threshold": 30.0})
        );

        let Some(DeviceCommand::Mode { threshold, .. }) = device_rx.recv().await else {
            panic!("device should receive the mode push");
        };
        assert!((threshold - 30.0).abs() < f64::EPSILON);

        let push = events.recv().await;
        let Ok(push) = push else {
            panic!("dashboards should receive mode_update");
        };
        assert_eq!(push.kind, "mode_update");
    }

    #[tokio::test]
    async fn mode_without_type_is_rejected_before_any_mutation() {
        let state = make_state().await;
        let mut events = state.relay.event_bus().subscribe();

        let request = post_json(
            "/api/mode",
            json!({"mode": "auto", "threshold": 30, "piId": "pi-1"}),
        );
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let control = state.relay.telemetry().control().await;
        assert_eq!(control.mode.to_string(), "manual");
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn mode_with_unrecognized_mode_string_is_rejected() {
        let state = make_state().await;
        let request = post_json(
            "/api/mode",
            json!({"type": "mode", "mode": "turbo", "piId": "pi-1"}),
        );
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.relay.telemetry().control().await.mode.to_string(), "manual");
    }

    #[tokio::test]
    async fn mode_to_disconnected_device_is_unavailable_but_sticks() {
        let state = make_state().await;
        let request = post_json(
            "/api/mode",
            json!({"type": "mode", "mode": "auto", "piId": "pi-1"}),
        );
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        // The cache keeps the new state; the divergence is visible.
        let control = state.relay.telemetry().control().await;
        assert_eq!(control.mode.to_string(), "auto");
        assert!(!control.device_synced);
    }

    #[tokio::test]
    async fn command_to_disconnected_device_is_unavailable() {
        let state = make_state().await;
        let mut events = state.relay.event_bus().subscribe();

        let request = post_json(
            "/api/send-command",
            json!({"piId": "pi-1", "actuator": "fan", "on": true}),
        );
        let (status, _) = send(state, request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn command_without_pi_id_is_a_bad_request() {
        let state = make_state().await;
        let request = post_json("/api/send-command", json!({"actuator": "fan"}));
        let (status, _) = send(state, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delivered_command_strips_pi_id_from_the_payload() {
        let state = make_state().await;
        let mut device_rx = connect_device(&state, "pi-1", DeviceRole::Sensor).await;

        let request = post_json(
            "/api/send-command",
            json!({"piId": "pi-1", "actuator": "fan", "on": true}),
        );
        let (status, body) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let Some(DeviceCommand::Command { data }) = device_rx.recv().await else {
            panic!("device should receive the command");
        };
        assert_eq!(data, json!({"actuator": "fan", "on": true}));
    }
}
