//! Video feed handler: multipart stream sampled from the frame buffer.
//!
//! One sampling loop per viewer, each at its own cadence over the shared
//! buffer. Nothing is queued per viewer: a slow consumer simply observes
//! the latest frame less often, which is the whole backpressure story.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use bytes::{BufMut, Bytes, BytesMut};
use futures_util::stream;
use tokio::time::MissedTickBehavior;

use crate::app_state::AppState;
#[cfg(test)]
use crate::domain::FrameBuffer;

const BOUNDARY: &str = "frame";

/// `GET /video_feed` — Live camera feed as a multipart stream.
///
/// Emits one part per sampled frame until the viewer disconnects, which
/// drops the body and cancels the sampling loop with it. Ticks with no
/// buffered frame emit nothing.
#[utoipa::path(
    get,
    path = "/video_feed",
    tag = "Stream",
    summary = "Live camera feed",
    description = "Streams the buffered camera frames as multipart/x-mixed-replace parts at a fixed sampling cadence. Unbounded duration; ends when the client disconnects.",
    responses(
        (status = 200, description = "Multipart frame stream (multipart/x-mixed-replace)"),
    )
)]
pub async fn video_feed(State(state): State<AppState>) -> impl IntoResponse {
    let frames = Arc::clone(state.relay.frames());
    let mut interval = tokio::time::interval(state.stream_interval);
    // A stalled viewer must not receive a burst of catch-up ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let body = stream::unfold((frames, interval), |(frames, mut interval)| async move {
        loop {
            interval.tick().await;
            if let Some(frame) = frames.peek().await {
                let part = encode_part(&frame);
                return Some((Ok::<_, Infallible>(part), (frames, interval)));
            }
        }
    });

    (
        [(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={BOUNDARY}"),
        )],
        Body::from_stream(body),
    )
}

/// Frames one buffered blob as a single multipart part.
fn encode_part(frame: &Bytes) -> Bytes {
    let header = format!(
        "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        frame.len()
    );
    let mut part = BytesMut::with_capacity(header.len() + frame.len() + 2);
    part.put(header.as_bytes());
    part.put(frame.clone());
    part.put(&b"\r\n"[..]);
    part.freeze()
}

/// One sampling step: a buffered frame becomes an encoded part, an empty
/// buffer becomes nothing.
#[cfg(test)]
async fn sample_once(frames: &FrameBuffer) -> Option<Bytes> {
    frames.peek().await.map(|frame| encode_part(&frame))
}

/// Stream routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/video_feed", get(video_feed))
}
