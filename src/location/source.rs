use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Options for a single positioning request, mirroring the knobs the
/// platform geolocation primitive exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Request the device's highest accuracy mode (GPS) instead of coarse
    /// network/cell positioning.
    pub high_accuracy: bool,
    /// How long the platform may spend producing a reading.
    pub timeout: Duration,
    /// Maximum age of a cached reading the platform may return. Zero
    /// forces a fresh fix.
    pub max_cache_age: Duration,
}

/// A raw reading from the positioning hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy_m: f64,
    pub altitude_m: Option<f64>,
    /// Fix timestamp reported by the platform.
    pub timestamp: DateTime<Utc>,
}

/// Error reported by the platform positioning primitive. The numeric
/// codes follow the geolocation API convention (1 = permission denied,
/// 2 = position unavailable, 3 = timeout).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("request timed out")]
    Timeout,

    #[error("geolocation unsupported")]
    Unsupported,
}

impl PositionError {
    /// Maps a platform error code to its classification. Unknown codes are
    /// treated as an unavailable position.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }
}

/// The platform geolocation primitive.
///
/// Implementations wrap whatever callback or event API the platform
/// offers into a single cancellable asynchronous request.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Whether a positioning capability exists at all. Sources that
    /// represent a missing capability return `false` and the engine
    /// surfaces `Unsupported` without attempting any tier.
    fn is_supported(&self) -> bool {
        true
    }

    /// Requests a single reading under the given options.
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<RawPosition, PositionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_codes_map_to_classified_errors() {
        assert_eq!(PositionError::from_code(1), PositionError::PermissionDenied);
        assert_eq!(
            PositionError::from_code(2),
            PositionError::PositionUnavailable
        );
        assert_eq!(PositionError::from_code(3), PositionError::Timeout);
    }

    #[test]
    fn test_unknown_code_is_treated_as_unavailable() {
        assert_eq!(
            PositionError::from_code(42),
            PositionError::PositionUnavailable
        );
    }
}
