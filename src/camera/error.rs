use thiserror::Error;

/// Camera failures surfaced to the UI. There is no automatic retry; the
/// user re-triggers the capture flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied. Please allow camera access in browser settings")]
    PermissionDenied,

    #[error("no camera device available")]
    NoDevice,

    #[error("camera failure: {0}")]
    Unknown(String),
}
