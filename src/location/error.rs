use std::fmt;
use thiserror::Error;

/// Classified geolocation failure, mapped from the platform error codes
/// (1/2/3) or from the absence of a geolocation capability.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    #[error("Location permission denied. Please enable it in browser settings.")]
    PermissionDenied,

    #[error("Location unavailable. Check GPS/Network.")]
    PositionUnavailable,

    #[error("Location request timed out. Move to an open area.")]
    Timeout,

    #[error("Geolocation is not supported on this device.")]
    Unsupported,
}

/// The final acquisition failure surfaced to the UI after all fallback
/// tiers are exhausted.
///
/// Browser geolocation silently refuses to work outside a secure context
/// (HTTPS or localhost); when the session was built with an insecure
/// context the message carries an explicit hint so the user is not left
/// staring at a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub secure_context_hint: bool,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind) -> Self {
        Self {
            kind,
            secure_context_hint: false,
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.secure_context_hint {
            write!(f, " (Secure Context Required: Use HTTPS or localhost)")?;
        }
        Ok(())
    }
}

impl std::error::Error for LocationError {}
