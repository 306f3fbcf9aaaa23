//! The platform camera primitive, modeled as a trait seam so the capture
//! flow can run against a real device surface or a scripted one in tests.
//!
//! The stream is a single exclusive hardware resource per session: whoever
//! opens it owns releasing it, exactly once, on every exit path.

mod error;

pub use error::CameraError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Preferred capture resolution. The device may substitute the closest
/// mode it supports.
pub const IDEAL_RESOLUTION: (u32, u32) = (1920, 1080);

/// Which camera to open. Issue reports default to the back camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    Front,
    Back,
}

/// A single frozen video frame, encoded as JPEG bytes by the platform
/// surface that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub bytes: Vec<u8>,
}

/// Handle to a live camera feed.
///
/// `release` must be idempotent from the device's point of view, but
/// callers are expected to invoke it exactly once; the session guarantees
/// this by taking the handle out of its slot before releasing.
pub trait VideoStream: Send {
    /// Freezes the current frame into an encoded image buffer.
    fn grab_frame(&mut self) -> Result<RawFrame, CameraError>;

    /// Releases the underlying hardware.
    fn release(&mut self);
}

/// Factory for camera streams, implemented by the embedding platform.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Opens a live feed at the requested facing and preferred resolution.
    async fn open_stream(
        &self,
        facing: Facing,
        ideal_resolution: (u32, u32),
    ) -> Result<Box<dyn VideoStream>, CameraError>;
}
