use crate::camera::{CameraDevice, Facing, IDEAL_RESOLUTION, RawFrame, VideoStream};
use crate::error::{CaptureError, GeosnapError};
use crate::geocode::{GeocodeBackend, resolve_address};
use crate::location::{
    LocationEngine, LocationFix, LocationState, PositionSource, TierProfile, default_tiers,
};
use crate::stamp::{StampConfig, StampError, stamp_photo};
use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Address half of the capture-session state machine. Resolution runs in
/// the background and never gates capture; whatever value is present at
/// confirm-time wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressState {
    Pending,
    Resolved(String),
    Unavailable,
}

/// Identity of the capturing device, injected explicitly so nothing in
/// the pipeline reads ambient platform state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
}

/// Metadata handed to the external submission flow alongside the stamped
/// image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    pub altitude_m: Option<f64>,
    pub captured_at: DateTime<Utc>,
    pub address: String,
    pub maps_url: String,
    pub device: DeviceInfo,
}

/// Everything a confirmed capture produces. The stamped image is an
/// opaque JPEG for the external uploader.
#[derive(Debug, Clone)]
pub struct CapturedReport {
    pub stamped_image: Vec<u8>,
    pub fix: LocationFix,
    pub address: String,
    pub metadata: ReportMetadata,
}

/// Ephemeral state for one report-a-photo interaction.
///
/// The session owns the camera stream and the background
/// acquisition/geocoding task. It is discarded once the user confirms or
/// cancels; dropping it releases everything.
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use geosnap::{CaptureSession, DeviceInfo, Nominatim};
/// # async fn example(
/// #     camera: Arc<dyn geosnap::CameraDevice>,
/// #     gps: Arc<dyn geosnap::PositionSource>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = CaptureSession::builder()
///     .camera(camera)
///     .position_source(gps)
///     .geocoder(Arc::new(Nominatim::new()?))
///     .device(DeviceInfo { user_agent: "app/1.0".into(), platform: "android".into() })
///     .build();
///
/// session.open().await?;
/// session.watch_location().wait_for(|state| state.is_ready()).await?;
/// session.capture()?;
/// let report = session.confirm().await?;
/// # Ok(())
/// # }
/// ```
pub struct CaptureSession {
    camera: Arc<dyn CameraDevice>,
    position_source: Arc<dyn PositionSource>,
    geocoder: Arc<dyn GeocodeBackend>,
    tiers: Vec<TierProfile>,
    secure_context: bool,
    resolution: (u32, u32),
    facing: Facing,
    device: DeviceInfo,
    stamp_config: StampConfig,

    stream: Option<Box<dyn VideoStream>>,
    raw_frame: Option<RawFrame>,
    frame_taken_at: Option<DateTime<Utc>>,
    location_tx: watch::Sender<LocationState>,
    location_rx: watch::Receiver<LocationState>,
    address_tx: watch::Sender<AddressState>,
    address_rx: watch::Receiver<AddressState>,
    background: Option<JoinHandle<()>>,
}

#[bon]
impl CaptureSession {
    /// Builds a session around the injected platform primitives.
    ///
    /// # Builder Arguments
    ///
    /// * `camera` - The platform camera surface.
    /// * `position_source` - The platform geolocation primitive.
    /// * `geocoder` - Reverse-geocoding backend, typically [`crate::Nominatim`].
    /// * `tiers` - (Default: [`default_tiers`]) Acquisition fallback profiles.
    /// * `secure_context` - (Default: `true`) Whether the embedding context
    ///   can use geolocation at all; `false` annotates surfaced location
    ///   errors with the HTTPS/localhost hint.
    /// * `resolution` - (Default: 1920×1080) Preferred stream resolution.
    /// * `facing` - (Default: back) Initial camera facing.
    /// * `device` - Device identity carried into the submission metadata.
    /// * `stamp_config` - Overlay timezone, watermark, and JPEG quality.
    #[builder]
    pub fn new(
        camera: Arc<dyn CameraDevice>,
        position_source: Arc<dyn PositionSource>,
        geocoder: Arc<dyn GeocodeBackend>,
        #[builder(default = default_tiers().to_vec())] tiers: Vec<TierProfile>,
        #[builder(default = true)] secure_context: bool,
        #[builder(default = IDEAL_RESOLUTION)] resolution: (u32, u32),
        #[builder(default = Facing::Back)] facing: Facing,
        #[builder(default)] device: DeviceInfo,
        #[builder(default)] stamp_config: StampConfig,
    ) -> Self {
        let (location_tx, location_rx) = watch::channel(LocationState::Idle);
        let (address_tx, address_rx) = watch::channel(AddressState::Pending);
        Self {
            camera,
            position_source,
            geocoder,
            tiers,
            secure_context,
            resolution,
            facing,
            device,
            stamp_config,
            stream: None,
            raw_frame: None,
            frame_taken_at: None,
            location_tx,
            location_rx,
            address_tx,
            address_rx,
            background: None,
        }
    }

    /// Starts the camera and kicks off location acquisition.
    pub async fn open(&mut self) -> Result<(), GeosnapError> {
        self.open_stream().await?;
        self.spawn_location_task();
        Ok(())
    }

    /// Re-runs the full tier sequence from tier 1, producing a fresh fix.
    /// The previous attempt, if still in flight, is aborted first.
    pub fn retry_location(&mut self) {
        self.spawn_location_task();
    }

    pub fn location_state(&self) -> LocationState {
        self.location_rx.borrow().clone()
    }

    pub fn address_state(&self) -> AddressState {
        self.address_rx.borrow().clone()
    }

    /// Subscription for UI updates on the location state machine.
    pub fn watch_location(&self) -> watch::Receiver<LocationState> {
        self.location_rx.clone()
    }

    /// Subscription for UI updates on address resolution.
    pub fn watch_address(&self) -> watch::Receiver<AddressState> {
        self.address_rx.clone()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn has_frame(&self) -> bool {
        self.raw_frame.is_some()
    }

    /// Freezes the current video frame.
    ///
    /// Precondition: a `Ready` location fix. An untagged report has no
    /// evidentiary value, so without a fix this is rejected with
    /// [`CaptureError::LocationNotReady`] and no frame is produced. On
    /// success the camera is released immediately — keeping the feed
    /// running after the frame is frozen only drains battery.
    pub fn capture(&mut self) -> Result<(), GeosnapError> {
        if !self.location_state().is_ready() {
            return Err(CaptureError::LocationNotReady.into());
        }
        let stream = self
            .stream
            .as_mut()
            .ok_or(CaptureError::NoActiveStream)?;
        let frame = stream.grab_frame()?;
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
        self.frame_taken_at = Some(Utc::now());
        self.raw_frame = Some(frame);
        debug!("frame captured, camera released");
        Ok(())
    }

    /// Discards the frozen frame and restarts the camera at the current
    /// facing.
    pub async fn retake(&mut self) -> Result<(), GeosnapError> {
        self.raw_frame = None;
        self.frame_taken_at = None;
        self.open_stream().await
    }

    /// Tears down and re-acquires the stream for the other camera.
    /// In-flight capture state (a frozen frame, the location fix) is
    /// unaffected.
    pub async fn switch_facing(&mut self, facing: Facing) -> Result<(), GeosnapError> {
        self.facing = facing;
        if self.stream.is_some() {
            self.open_stream().await
        } else {
            Ok(())
        }
    }

    /// Stamps the frozen frame and produces the submission payload.
    ///
    /// Reads whatever address is available right now — resolution still
    /// pending or failed falls back to the coordinate string inside the
    /// stamp. On stamping failure the raw frame is preserved so the user
    /// can retake.
    pub async fn confirm(&mut self) -> Result<CapturedReport, GeosnapError> {
        let frame = self.raw_frame.as_ref().ok_or(CaptureError::NothingCaptured)?;
        let captured_at = self.frame_taken_at.ok_or(CaptureError::NothingCaptured)?;
        let LocationState::Ready(fix) = self.location_state() else {
            return Err(CaptureError::LocationNotReady.into());
        };
        let address = match self.address_state() {
            AddressState::Resolved(text) => text,
            AddressState::Pending | AddressState::Unavailable => String::new(),
        };

        let bytes = frame.bytes.clone();
        let stamp_fix = fix.clone();
        let stamp_address = address.clone();
        let device = self.device.clone();
        let config = self.stamp_config.clone();
        let stamped = match tokio::task::spawn_blocking(move || {
            stamp_photo(
                &bytes,
                &stamp_fix,
                &stamp_address,
                captured_at,
                &device,
                &config,
            )
        })
        .await
        {
            Ok(result) => result?,
            Err(join_err) => {
                return Err(GeosnapError::Stamping(StampError::Worker(
                    join_err.to_string(),
                )));
            }
        };

        let metadata = ReportMetadata {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy_m: fix.accuracy_m,
            altitude_m: fix.altitude_m,
            captured_at,
            address: address.clone(),
            maps_url: format!(
                "https://www.google.com/maps?q={},{}",
                fix.latitude, fix.longitude
            ),
            device: self.device.clone(),
        };

        debug!(bytes = stamped.len(), "capture confirmed");
        self.raw_frame = None;
        self.frame_taken_at = None;
        Ok(CapturedReport {
            stamped_image: stamped,
            fix,
            address,
            metadata,
        })
    }

    /// Ends the session: aborts the in-flight acquisition/geocode task
    /// and releases the camera. Both run unconditionally — neither can
    /// short-circuit the other — and each fires at most once. Safe to
    /// call repeatedly; `Drop` calls it as a backstop.
    pub fn close(&mut self) {
        if let Some(task) = self.background.take() {
            task.abort();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }

    async fn open_stream(&mut self) -> Result<(), GeosnapError> {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
        let stream = self.camera.open_stream(self.facing, self.resolution).await?;
        self.stream = Some(stream);
        Ok(())
    }

    fn spawn_location_task(&mut self) {
        if let Some(task) = self.background.take() {
            task.abort();
        }
        let engine = LocationEngine::new(
            self.position_source.clone(),
            self.tiers.clone(),
            self.secure_context,
        );
        let geocoder = self.geocoder.clone();
        let location_tx = self.location_tx.clone();
        let address_tx = self.address_tx.clone();
        let _ = location_tx.send(LocationState::Acquiring);
        let _ = address_tx.send(AddressState::Pending);
        self.background = Some(tokio::spawn(async move {
            match engine.acquire().await {
                Ok(fix) => {
                    let _ = location_tx.send(LocationState::Ready(fix.clone()));
                    // Background enrichment; capture never waits on this.
                    let address =
                        resolve_address(geocoder.as_ref(), fix.latitude, fix.longitude).await;
                    let _ = address_tx.send(AddressState::Resolved(address));
                }
                Err(err) => {
                    warn!(%err, "location acquisition failed");
                    let _ = location_tx.send(LocationState::Failed(err));
                    let _ = address_tx.send(AddressState::Unavailable);
                }
            }
        }));
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}
