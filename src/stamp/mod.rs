//! Deterministic metadata stamping.
//!
//! Burns location, address, and capture-time metadata into a copy of the
//! captured photo as visible pixels (distinct from EXIF tagging, which is
//! trivially stripped). Given identical inputs the output bytes are
//! identical, which makes the stamped image usable for integrity checks:
//! nothing in the pipeline reads the clock, ambient device state, or any
//! shared drawing surface.

mod draw;
mod error;
pub mod layout;

pub use error::StampError;

use crate::location::LocationFix;
use crate::session::DeviceInfo;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;

/// Fixed output quality for stamped JPEGs.
const JPEG_QUALITY: u8 = 90;

/// Overlay configuration. The defaults match the issue-report product:
/// Indian civic reports stamped in IST under the CITIZENZ brand.
#[derive(Debug, Clone)]
pub struct StampConfig {
    /// Timezone the date, time, and `GMT±HH:MM` label render in.
    pub timezone: Tz,
    /// Brand watermark, drawn large and mostly transparent.
    pub watermark: String,
    /// Small line under the watermark.
    pub tagline: String,
    pub jpeg_quality: u8,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Kolkata,
            watermark: "CITIZENZ".to_string(),
            tagline: "GPS Map Camera".to_string(),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Produces a new JPEG identical to the input except for the burned-in
/// overlay: gradient contrast band, map thumbnail, address block,
/// coordinates, capture time, accuracy, and watermark.
///
/// `captured_at` and `device` travel as explicit parameters so the
/// overlay stays a pure function of its inputs; the current layout
/// renders the timestamp but carries the device identity through
/// untouched for the submission payload.
///
/// # Errors
///
/// Any decode or encode failure rejects the whole operation with
/// [`StampError`]; no partially-stamped image is returned and the caller
/// keeps the raw frame.
pub fn stamp_photo(
    raw_jpeg: &[u8],
    fix: &LocationFix,
    address: &str,
    captured_at: DateTime<Utc>,
    _device: &DeviceInfo,
    config: &StampConfig,
) -> Result<Vec<u8>, StampError> {
    let decoded = image::load_from_memory(raw_jpeg).map_err(StampError::Decode)?;
    let mut canvas = decoded.to_rgba8();
    let (width, height) = canvas.dimensions();

    draw::darken_bottom(&mut canvas, layout::GRADIENT_BAND);

    if layout::map_fits(width, height) {
        let (map_x, map_y) = layout::map_origin(height);
        draw::draw_map_placeholder(&mut canvas, map_x, map_y, layout::MAP_SIZE, layout::MAP_CELL);
    }

    let overlay = layout::build_layout(
        width,
        height,
        fix,
        address,
        captured_at,
        config.timezone,
        &config.watermark,
        &config.tagline,
    );
    for span in &overlay.spans {
        draw::draw_text(
            &mut canvas,
            &span.text,
            span.x,
            span.y,
            span.scale,
            span.bold,
            span.color,
        );
    }

    let rgb = image::DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut bytes = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, config.jpeg_quality);
    encoder.encode_image(&rgb).map_err(StampError::Encode)?;
    Ok(bytes.into_inner())
}
