//! # Geosnap
//!
//! The capture core of a citizen-issue-reporting client: obtain a GPS
//! fix, photograph a civic problem, and burn the evidence metadata into
//! the image itself.
//!
//! ## Key Features
//!
//! - **Tiered Location Acquisition**: a cached-fast attempt, a fresh
//!   high-accuracy attempt, then coarse network positioning — strictly in
//!   order, first success wins, every tier bounded by its own timeout.
//! - **Reverse Geocoding**: best-effort street-level address resolution
//!   via Nominatim, with one retry and a deterministic coordinate
//!   fallback that never blocks capture.
//! - **Capture Orchestration**: a session that owns the camera stream as
//!   a scoped resource and refuses to capture without a location fix.
//! - **Metadata Stamping**: deterministic overlay rendering — address,
//!   coordinates, timestamp, accuracy, watermark — producing
//!   byte-reproducible JPEG output suitable for later integrity checks.
//! - **Priority Scoring**: a stateless keyword-weighted scorer for
//!   submitted reports.
//!
//! ## Usage
//!
//! The stamping pipeline is a pure function and can be used on its own:
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use geosnap::{DeviceInfo, LocationFix, StampConfig, stamp_photo};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let raw = std::fs::read("report.jpg")?;
//!     let fix = LocationFix {
//!         latitude: 18.5204,
//!         longitude: 73.8567,
//!         accuracy_m: 45.0,
//!         altitude_m: None,
//!         captured_at: Utc::now(),
//!     };
//!
//!     let stamped = stamp_photo(
//!         &raw,
//!         &fix,
//!         "Shivajinagar, Pune",
//!         Utc::now(),
//!         &DeviceInfo::default(),
//!         &StampConfig::default(),
//!     )?;
//!
//!     std::fs::write("report-stamped.jpg", stamped)?;
//!     Ok(())
//! }
//! ```
//!
//! The full flow runs through [`CaptureSession`], built around the
//! platform camera and geolocation primitives injected as traits.

pub mod camera;
pub mod error;
pub mod geocode;
pub mod location;
pub mod priority;
pub mod session;
pub mod stamp;

pub use camera::{CameraDevice, CameraError, Facing, RawFrame, VideoStream};
pub use error::{CaptureError, GeosnapError};
pub use geocode::{GeocodeBackend, Nominatim, coordinate_text, resolve_address};
pub use location::{
    LocationEngine, LocationError, LocationErrorKind, LocationFix, LocationState, PositionSource,
};
pub use priority::{Priority, PriorityLevel, score_issue};
pub use session::{AddressState, CaptureSession, CapturedReport, DeviceInfo, ReportMetadata};
pub use stamp::{StampConfig, StampError, stamp_photo};
