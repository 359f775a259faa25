//! Latest-frame buffer for the camera stream.
//!
//! [`FrameBuffer`] retains exactly one frame: the most recent blob the
//! camera sent. Viewers sample it at their own cadence, so a slow viewer
//! simply observes fewer frames; nothing is ever queued on its behalf.
//! The buffer is the implicit backpressure mechanism.

use bytes::Bytes;
use tokio::sync::RwLock;

/// Holds the most recent binary camera frame, if any.
///
/// Frames are opaque to the hub; no decoding happens here. [`Bytes`]
/// keeps `peek` cheap: a clone is a reference-count bump, so any number
/// of concurrent viewers can read the same frame without copying it.
#[derive(Debug)]
pub struct FrameBuffer {
    frame: RwLock<Option<Bytes>>,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: RwLock::new(None),
        }
    }

    /// Overwrites the buffered frame.
    pub async fn set_frame(&self, frame: Bytes) {
        *self.frame.write().await = Some(frame);
    }

    /// Empties the buffer. Invoked when the camera connection closes, as
    /// frames are not meaningful once their source is gone.
    pub async fn clear(&self) {
        *self.frame.write().await = None;
    }

    /// Returns the buffered frame without consuming it.
    ///
    /// The same frame may be observed by many samples before being
    /// overwritten.
    pub async fn peek(&self) -> Option<Bytes> {
        self.frame.read().await.clone()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
