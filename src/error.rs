use thiserror::Error;

/// Precondition violations in the capture flow. These surface as disabled
/// affordances in the UI rather than crashes; a report without a location
/// fix has no evidentiary value, so capture is simply refused until a fix
/// exists.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a ready location fix is required before capturing")]
    LocationNotReady,

    #[error("no active camera stream")]
    NoActiveStream,

    #[error("no captured frame to confirm")]
    NothingCaptured,
}

/// The primary error type for the geosnap crate.
///
/// Geocoding errors are intentionally absent: address resolution is
/// best-effort and degrades to a coordinate string instead of surfacing.
#[derive(Error, Debug)]
pub enum GeosnapError {
    #[error("location acquisition failed: {0}")]
    Location(#[from] crate::location::LocationError),

    #[error("camera failure: {0}")]
    Camera(#[from] crate::camera::CameraError),

    #[error("capture precondition failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("stamping failed: {0}")]
    Stamping(#[from] crate::stamp::StampError),
}
