use crate::location::error::LocationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single resolved GPS reading.
///
/// Immutable once produced: a retry creates a fresh fix rather than
/// mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy_m: f64,
    /// Altitude in meters, when the platform reports one.
    pub altitude_m: Option<f64>,
    /// Timestamp the positioning hardware assigned to this fix.
    pub captured_at: DateTime<Utc>,
}

/// One accuracy/cache/timeout profile in the acquisition fallback
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProfile {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_cache_age: Duration,
}

/// The default three-tier sequence.
///
/// 1. Cached-fast: accept a reading up to 60 s old with a 2 s budget. The
///    typical repeat-use case already has a recent fix, and this skips the
///    multi-second GPS warm-up entirely.
/// 2. Fresh-high-accuracy: force a new GPS fix. The 15 s budget is the
///    conservative choice; shorter budgets measurably lose fixes on poor
///    signal.
/// 3. Fresh-low-accuracy: coarse network/cell positioning with a 10 s
///    budget, the guaranteed best-effort answer when GPS cannot lock.
pub fn default_tiers() -> [TierProfile; 3] {
    [
        TierProfile {
            high_accuracy: true,
            timeout: Duration::from_secs(2),
            max_cache_age: Duration::from_secs(60),
        },
        TierProfile {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            max_cache_age: Duration::ZERO,
        },
        TierProfile {
            high_accuracy: false,
            timeout: Duration::from_secs(10),
            max_cache_age: Duration::ZERO,
        },
    ]
}

/// Location half of the capture-session state machine.
///
/// `Failed` is terminal until a retry re-enters `Acquiring`; `Ready` is
/// terminal for the session.
#[derive(Debug, Clone)]
pub enum LocationState {
    Idle,
    Acquiring,
    Ready(LocationFix),
    Failed(LocationError),
}

impl LocationState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
