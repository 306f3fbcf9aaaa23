//! Pure layout for the stamped overlay: text shaping, timestamp
//! formatting, and pixel geometry, kept free of any drawing so every
//! rendered string and position can be asserted directly.

use crate::geocode::coordinate_text;
use crate::location::LocationFix;
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Height of the darkening gradient band at the bottom of the image,
/// clamped to the image height for very small frames.
pub const GRADIENT_BAND: u32 = 250;
/// Margin between overlay content and the image edges.
pub const PADDING: i32 = 20;
/// Side length of the static map thumbnail.
pub const MAP_SIZE: i32 = 100;
/// Grid cell size inside the map thumbnail.
pub const MAP_CELL: i32 = 25;
/// Edge length of one embedded glyph cell before scaling.
pub const GLYPH_SIZE: u32 = 8;

/// Character budget per wrapped address line.
const WRAP_WIDTH: usize = 45;
/// At most this many wrapped address lines are rendered.
const MAX_ADDRESS_LINES: usize = 2;
/// Character budget for the bolded headline.
const PRIMARY_MAX: usize = 25;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const GRAY_200: [u8; 4] = [229, 231, 235, 255];
const GRAY_300: [u8; 4] = [209, 213, 219, 255];
const WATERMARK_INK: [u8; 4] = [255, 255, 255, 38];
const TAGLINE_INK: [u8; 4] = [255, 255, 255, 102];

/// One positioned run of text in the overlay, top-left anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub scale: u32,
    pub bold: bool,
    pub color: [u8; 4],
}

/// The complete overlay for one stamp call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout {
    pub spans: Vec<TextSpan>,
}

/// Top-left corner of the map thumbnail.
pub fn map_origin(height: u32) -> (i32, i32) {
    (PADDING, height as i32 - MAP_SIZE - PADDING)
}

/// Whether the image is large enough to hold the map thumbnail at all.
pub fn map_fits(width: u32, height: u32) -> bool {
    width as i32 >= MAP_SIZE + 2 * PADDING && height as i32 >= MAP_SIZE + 2 * PADDING
}

/// Rendered width of `text` at the given scale, in pixels.
pub fn text_width(text: &str, scale: u32, bold: bool) -> i32 {
    let glyphs = text.chars().count() as i32;
    glyphs * (GLYPH_SIZE * scale) as i32 + if bold { 1 } else { 0 }
}

/// Truncates to `max_len` characters, appending `...` when shortened.
pub fn shorten_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let mut shortened: String = text.chars().take(max_len).collect();
        shortened.push_str("...");
        shortened
    } else {
        text.to_string()
    }
}

/// Greedy word wrap at `max_len` characters per line.
pub fn wrap_text(text: &str, max_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_len {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `DD Mon YYYY`, e.g. `07 Aug 2026`, in the stamp timezone.
pub fn format_date(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%d %b %Y").to_string()
}

/// `HH:MM` in the stamp timezone.
pub fn format_time(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%H:%M").to_string()
}

/// Fixed offset label for the stamp timezone at the capture instant,
/// e.g. `GMT+05:30`.
pub fn timezone_label(tz: Tz, at: DateTime<Utc>) -> String {
    let offset_seconds = tz
        .offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc();
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let total = offset_seconds.unsigned_abs();
    format!("GMT{sign}{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

/// The bolded headline: a most-specific-first shortening of the address
/// (second component + last component) when it is long, the coordinate
/// string when no address is available.
pub fn primary_line(address: &str, fix: &LocationFix) -> String {
    if address.is_empty() {
        return coordinate_text(fix.latitude, fix.longitude);
    }
    let parts: Vec<&str> = address.split(", ").collect();
    let short = if parts.len() > 2 {
        format!("{}, {}", parts[1], parts[parts.len() - 1])
    } else {
        address.to_string()
    };
    shorten_text(&short, PRIMARY_MAX)
}

/// The wrapped address body; the coordinate string stands in for a
/// missing address.
pub fn address_lines(address: &str, fix: &LocationFix) -> Vec<String> {
    let display = if address.is_empty() {
        coordinate_text(fix.latitude, fix.longitude)
    } else {
        address.to_string()
    };
    wrap_text(&display, WRAP_WIDTH)
        .into_iter()
        .take(MAX_ADDRESS_LINES)
        .collect()
}

/// Monospaced coordinate line, 6 decimal places.
pub fn coordinates_line(fix: &LocationFix) -> String {
    format!("Lat {:.6}  Long {:.6}", fix.latitude, fix.longitude)
}

/// Accuracy radius in integer meters, e.g. `±45m`.
pub fn accuracy_label(fix: &LocationFix) -> String {
    format!("\u{b1}{}m", fix.accuracy_m.round() as i64)
}

/// Builds the full overlay: headline, address body, coordinates,
/// date/time with the timezone label, accuracy, and the watermark pair.
#[allow(clippy::too_many_arguments)]
pub fn build_layout(
    width: u32,
    height: u32,
    fix: &LocationFix,
    address: &str,
    captured_at: DateTime<Utc>,
    tz: Tz,
    watermark: &str,
    tagline: &str,
) -> OverlayLayout {
    let (map_x, map_y) = map_origin(height);
    let text_x = map_x + MAP_SIZE + 15;
    let mut spans = Vec::new();

    spans.push(TextSpan {
        text: primary_line(address, fix),
        x: text_x,
        y: map_y,
        scale: 2,
        bold: true,
        color: WHITE,
    });

    for (index, line) in address_lines(address, fix).into_iter().enumerate() {
        spans.push(TextSpan {
            text: line,
            x: text_x,
            y: map_y + 20 + index as i32 * 18,
            scale: 2,
            bold: false,
            color: GRAY_200,
        });
    }

    spans.push(TextSpan {
        text: coordinates_line(fix),
        x: text_x,
        y: map_y + 60,
        scale: 2,
        bold: true,
        color: WHITE,
    });

    let stamp_time = format!(
        "{} {} {}",
        format_date(captured_at, tz),
        format_time(captured_at, tz),
        timezone_label(tz, captured_at),
    );
    spans.push(TextSpan {
        text: stamp_time,
        x: text_x,
        y: map_y + 80,
        scale: 1,
        bold: false,
        color: GRAY_300,
    });

    spans.push(TextSpan {
        text: accuracy_label(fix),
        x: text_x,
        y: map_y + 90,
        scale: 1,
        bold: false,
        color: GRAY_300,
    });

    // Brand watermark, right-aligned against the padding edge.
    let right = width as i32 - PADDING;
    spans.push(TextSpan {
        text: watermark.to_string(),
        x: right - text_width(watermark, 3, true),
        y: map_y + 5,
        scale: 3,
        bold: true,
        color: WATERMARK_INK,
    });
    spans.push(TextSpan {
        text: tagline.to_string(),
        x: right - text_width(tagline, 1, false),
        y: map_y + 32,
        scale: 1,
        bold: false,
        color: TAGLINE_INK,
    });

    OverlayLayout { spans }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use chrono_tz::Asia::Kolkata;

    fn pune_fix() -> LocationFix {
        LocationFix {
            latitude: 18.5204,
            longitude: 73.8567,
            accuracy_m: 45.4,
            altitude_m: None,
            captured_at: Utc.with_ymd_and_hms(2026, 8, 7, 9, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_wrap_respects_character_budget() {
        let lines = wrap_text("Sharda Cafe, 12, MG Road, Shivajinagar, Pune, Maharashtra", 45);

        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(
                line.chars().count() <= 45,
                "line exceeds budget: {line:?}"
            );
        }
    }

    #[test]
    fn test_wrap_keeps_overlong_word_on_its_own_line() {
        let lines = wrap_text("a Hanumannagar-Paschimbhag b", 10);
        assert_eq!(lines, vec!["a", "Hanumannagar-Paschimbhag", "b"]);
    }

    #[test]
    fn test_wrap_empty_is_empty() {
        assert!(wrap_text("", 45).is_empty());
    }

    #[test]
    fn test_shorten_appends_ellipsis_only_when_needed() {
        assert_eq!(shorten_text("Pune", 25), "Pune");
        assert_eq!(
            shorten_text("Shivajinagar, Pune, Maharashtra", 12),
            "Shivajinagar..."
        );
    }

    #[test]
    fn test_primary_line_uses_second_and_last_components() {
        let line = primary_line("12, MG Road, Shivajinagar, Pune, Maharashtra", &pune_fix());
        assert_eq!(line, "MG Road, Maharashtra");
    }

    #[test]
    fn test_primary_line_keeps_short_addresses_whole() {
        assert_eq!(primary_line("Shivajinagar, Pune", &pune_fix()), "Shivajinagar, Pune");
    }

    #[test]
    fn test_primary_line_falls_back_to_coordinates() {
        assert_eq!(primary_line("", &pune_fix()), "18.520400, 73.856700");
    }

    #[test]
    fn test_address_lines_fall_back_to_coordinates() {
        assert_eq!(address_lines("", &pune_fix()), vec!["18.520400, 73.856700"]);
    }

    #[test]
    fn test_coordinates_line_uses_six_decimals() {
        assert_eq!(
            coordinates_line(&pune_fix()),
            "Lat 18.520400  Long 73.856700"
        );
    }

    #[test]
    fn test_accuracy_label_rounds_to_integer_meters() {
        assert_eq!(accuracy_label(&pune_fix()), "\u{b1}45m");
    }

    #[test]
    fn test_kolkata_timezone_label() {
        assert_eq!(
            timezone_label(Kolkata, pune_fix().captured_at),
            "GMT+05:30"
        );
    }

    #[test]
    fn test_date_and_time_render_in_stamp_timezone() {
        let at = pune_fix().captured_at; // 09:05 UTC
        assert_eq!(format_date(at, Kolkata), "07 Aug 2026");
        assert_eq!(format_time(at, Kolkata), "14:35");
    }

    #[test]
    fn test_layout_contains_every_required_span() {
        let fix = pune_fix();
        let layout = build_layout(
            1920,
            1080,
            &fix,
            "Shivajinagar, Pune",
            fix.captured_at,
            Kolkata,
            "CITIZENZ",
            "GPS Map Camera",
        );

        let texts: Vec<&str> = layout.spans.iter().map(|s| s.text.as_str()).collect();
        assert!(texts.contains(&"Shivajinagar, Pune"));
        assert!(texts.contains(&"Lat 18.520400  Long 73.856700"));
        assert!(texts.contains(&"07 Aug 2026 14:35 GMT+05:30"));
        assert!(texts.contains(&"\u{b1}45m"));
        assert!(texts.contains(&"CITIZENZ"));
        assert!(texts.contains(&"GPS Map Camera"));
    }

    #[test]
    fn test_layout_right_aligns_watermark_inside_padding() {
        let fix = pune_fix();
        let layout = build_layout(
            1280,
            720,
            &fix,
            "",
            fix.captured_at,
            Kolkata,
            "CITIZENZ",
            "GPS Map Camera",
        );

        let watermark = layout
            .spans
            .iter()
            .find(|s| s.text == "CITIZENZ")
            .unwrap();
        assert_eq!(
            watermark.x + text_width("CITIZENZ", watermark.scale, watermark.bold),
            1280 - PADDING
        );
    }
}
