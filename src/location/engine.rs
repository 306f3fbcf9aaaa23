use crate::location::error::{LocationError, LocationErrorKind};
use crate::location::source::{PositionError, PositionOptions, PositionSource};
use crate::location::structs::{LocationFix, TierProfile};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Orchestrates the tiered acquisition sequence over a platform position
/// source.
///
/// Tiers run strictly in order and the first success wins; each tier's
/// failure is swallowed and logged, and only the final tier's failure
/// reason is surfaced. The engine never retries on its own — re-running
/// the sequence is an explicit caller decision.
pub struct LocationEngine {
    source: Arc<dyn PositionSource>,
    tiers: Vec<TierProfile>,
    secure_context: bool,
}

impl LocationEngine {
    pub fn new(
        source: Arc<dyn PositionSource>,
        tiers: Vec<TierProfile>,
        secure_context: bool,
    ) -> Self {
        Self {
            source,
            tiers,
            secure_context,
        }
    }

    /// Runs the fallback sequence and returns the first fix obtained.
    ///
    /// Every tier is bounded by its own timeout, enforced here with
    /// [`tokio::time::timeout`] regardless of whether the underlying
    /// source honors the option — exceeding it advances to the next tier,
    /// never hangs.
    pub async fn acquire(&self) -> Result<LocationFix, LocationError> {
        if !self.source.is_supported() {
            return Err(self.surface(LocationErrorKind::Unsupported));
        }

        let mut last_failure = LocationErrorKind::PositionUnavailable;
        for (index, tier) in self.tiers.iter().enumerate() {
            let tier_no = index + 1;
            debug!(
                tier = tier_no,
                high_accuracy = tier.high_accuracy,
                timeout_ms = tier.timeout.as_millis() as u64,
                max_cache_age_ms = tier.max_cache_age.as_millis() as u64,
                "requesting position"
            );

            let request = self.source.current_position(PositionOptions {
                high_accuracy: tier.high_accuracy,
                timeout: tier.timeout,
                max_cache_age: tier.max_cache_age,
            });
            match timeout(tier.timeout, request).await {
                Ok(Ok(position)) => {
                    debug!(
                        tier = tier_no,
                        accuracy_m = position.accuracy_m,
                        "position acquired"
                    );
                    return Ok(LocationFix {
                        latitude: position.latitude,
                        longitude: position.longitude,
                        accuracy_m: position.accuracy_m,
                        altitude_m: position.altitude_m,
                        captured_at: position.timestamp,
                    });
                }
                Ok(Err(err)) => {
                    warn!(tier = tier_no, %err, "tier failed, falling back");
                    last_failure = classify(err);
                }
                Err(_) => {
                    warn!(tier = tier_no, "tier timed out, falling back");
                    last_failure = LocationErrorKind::Timeout;
                }
            }
        }

        Err(self.surface(last_failure))
    }

    fn surface(&self, kind: LocationErrorKind) -> LocationError {
        LocationError {
            kind,
            secure_context_hint: !self.secure_context,
        }
    }
}

fn classify(err: PositionError) -> LocationErrorKind {
    match err {
        PositionError::PermissionDenied => LocationErrorKind::PermissionDenied,
        PositionError::PositionUnavailable => LocationErrorKind::PositionUnavailable,
        PositionError::Timeout => LocationErrorKind::Timeout,
        PositionError::Unsupported => LocationErrorKind::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::source::RawPosition;
    use crate::location::structs::default_tiers;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// One scripted response from the fake platform source.
    enum Step {
        Fix(RawPosition),
        Fail(PositionError),
        /// Never resolves; forces the engine-enforced tier timeout.
        Hang,
    }

    struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<PositionOptions>>,
        supported: bool,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: Mutex::new(Vec::new()),
                supported: true,
            }
        }

        fn unsupported() -> Self {
            Self {
                supported: false,
                ..Self::new(Vec::new())
            }
        }

        fn calls(&self) -> Vec<PositionOptions> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PositionSource for ScriptedSource {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn current_position(
            &self,
            options: PositionOptions,
        ) -> Result<RawPosition, PositionError> {
            self.calls.lock().unwrap().push(options);
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(Step::Fix(position)) => Ok(position),
                Some(Step::Fail(err)) => Err(err),
                Some(Step::Hang) | None => std::future::pending().await,
            }
        }
    }

    fn fix_at(lat: f64, lon: f64, accuracy: f64) -> RawPosition {
        RawPosition {
            latitude: lat,
            longitude: lon,
            accuracy_m: accuracy,
            altitude_m: Some(560.0),
            timestamp: Utc::now(),
        }
    }

    fn engine(source: ScriptedSource) -> (Arc<ScriptedSource>, LocationEngine) {
        let source = Arc::new(source);
        let engine = LocationEngine::new(source.clone(), default_tiers().to_vec(), true);
        (source, engine)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_tier_success_stops_the_sequence() {
        let (source, engine) =
            engine(ScriptedSource::new(vec![Step::Fix(fix_at(18.5204, 73.8567, 45.0))]));

        let fix = engine.acquire().await.unwrap();

        assert_eq!(fix.latitude, 18.5204);
        assert_eq!(fix.accuracy_m, 45.0);
        assert_eq!(fix.altitude_m, Some(560.0));
        // Only tier 1 was ever attempted.
        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].high_accuracy);
        assert_eq!(calls[0].max_cache_age, Duration::from_secs(60));
        assert_eq!(calls[0].timeout, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tier_one_timeout_falls_through_to_tier_two() {
        let (source, engine) = engine(ScriptedSource::new(vec![
            Step::Hang,
            Step::Fix(fix_at(19.076, 72.877, 12.0)),
        ]));

        let fix = engine.acquire().await.unwrap();

        assert_eq!(fix.longitude, 72.877);
        // Tier 2 succeeded, so tier 3 must never have been attempted.
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].high_accuracy);
        assert_eq!(calls[1].max_cache_age, Duration::ZERO);
        assert_eq!(calls[1].timeout, Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_tier_profile_is_coarse() {
        let (source, engine) = engine(ScriptedSource::new(vec![
            Step::Hang,
            Step::Fail(PositionError::PositionUnavailable),
            Step::Fix(fix_at(28.6139, 77.209, 850.0)),
        ]));

        let fix = engine.acquire().await.unwrap();

        assert_eq!(fix.accuracy_m, 850.0);
        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        assert!(!calls[2].high_accuracy, "tier 3 must use coarse positioning");
        assert_eq!(calls[2].timeout, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_tiers_failing_surfaces_the_final_tier_reason() {
        // Tier 1 denied, tier 2 times out, tier 3 reports unavailable:
        // the surfaced error must be tier 3's, not tier 1's.
        let (source, engine) = engine(ScriptedSource::new(vec![
            Step::Fail(PositionError::PermissionDenied),
            Step::Hang,
            Step::Fail(PositionError::PositionUnavailable),
        ]));

        let err = engine.acquire().await.unwrap_err();

        assert_eq!(err.kind, LocationErrorKind::PositionUnavailable);
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_tier_timeout_surfaces_timeout() {
        let (_, engine) = engine(ScriptedSource::new(vec![
            Step::Fail(PositionError::PermissionDenied),
            Step::Hang,
            Step::Hang,
        ]));

        let err = engine.acquire().await.unwrap_err();
        assert_eq!(err.kind, LocationErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_source_skips_every_tier() {
        let (source, engine) = engine(ScriptedSource::unsupported());

        let err = engine.acquire().await.unwrap_err();

        assert_eq!(err.kind, LocationErrorKind::Unsupported);
        assert!(source.calls().is_empty(), "no tier may run without a capability");
    }

    #[tokio::test(start_paused = true)]
    async fn test_insecure_context_annotates_the_surfaced_error() {
        let source = Arc::new(ScriptedSource::new(vec![
            Step::Fail(PositionError::PermissionDenied),
            Step::Fail(PositionError::PermissionDenied),
            Step::Fail(PositionError::PermissionDenied),
        ]));
        let engine = LocationEngine::new(source, default_tiers().to_vec(), false);

        let err = engine.acquire().await.unwrap_err();

        assert!(err.secure_context_hint);
        assert!(err.to_string().contains("Secure Context Required"));
    }
}
