//! Raster primitives for the overlay: source-over blending, the embedded
//! bitmap font, the gradient band, and the map placeholder tile.

use crate::stamp::layout::GLYPH_SIZE;
use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Source-over blend of `color` onto the pixel at (x, y); no-op outside
/// the canvas bounds, so callers never need to clip.
fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let alpha = u32::from(color[3]);
    if alpha == 0 {
        return;
    }
    let px = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        let src = u32::from(color[channel]);
        let dst = u32::from(px.0[channel]);
        px.0[channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
    }
    px.0[3] = 255;
}

/// Darkens the bottom `band` rows with a ramp from transparent through
/// 50% at 30% depth to 90% at the bottom edge, guaranteeing overlay text
/// contrast regardless of the underlying photo.
pub(crate) fn darken_bottom(canvas: &mut RgbaImage, band: u32) {
    let height = canvas.height();
    let width = canvas.width();
    let band = band.min(height);
    if band == 0 {
        return;
    }
    let top = height - band;
    for y in top..height {
        let depth = (y - top) as f32 / band as f32;
        let opacity = if depth < 0.3 {
            depth / 0.3 * 0.5
        } else {
            0.5 + (depth - 0.3) / 0.7 * 0.4
        };
        let alpha = (opacity * 255.0).round() as u8;
        for x in 0..width {
            blend_pixel(canvas, i64::from(x), i64::from(y), [0, 0, 0, alpha]);
        }
    }
}

fn fill_scaled(canvas: &mut RgbaImage, x: i32, y: i32, scale: u32, color: [u8; 4]) {
    for dy in 0..scale {
        for dx in 0..scale {
            blend_pixel(
                canvas,
                i64::from(x) + i64::from(dx),
                i64::from(y) + i64::from(dy),
                color,
            );
        }
    }
}

fn glyph_for(ch: char) -> Option<[u8; 8]> {
    if ch.is_ascii() {
        Some(BASIC_LEGACY[ch as usize])
    } else {
        None
    }
}

/// Draws `text` with the embedded 8x8 bitmap font, top-left anchored.
/// Bold double-strikes one pixel to the right. Characters without a
/// glyph advance the pen without leaving ink.
pub(crate) fn draw_text(
    canvas: &mut RgbaImage,
    text: &str,
    x: i32,
    y: i32,
    scale: u32,
    bold: bool,
    color: [u8; 4],
) {
    let advance = (GLYPH_SIZE * scale) as i32;
    let mut pen_x = x;
    for ch in text.chars() {
        if let Some(glyph) = glyph_for(ch) {
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1u8 << col) == 0 {
                        continue;
                    }
                    let px = pen_x + (col * scale) as i32;
                    let py = y + (row as u32 * scale) as i32;
                    fill_scaled(canvas, px, py, scale, color);
                    if bold {
                        fill_scaled(canvas, px + 1, py, scale, color);
                    }
                }
            }
        }
        pen_x += advance;
    }
}

/// The static map thumbnail placeholder: a light tile with grid lines
/// and a red location pin, matching the look of a minimal map snapshot.
pub(crate) fn draw_map_placeholder(canvas: &mut RgbaImage, x: i32, y: i32, size: i32, cell: i32) {
    draw_filled_rect_mut(
        canvas,
        Rect::at(x, y).of_size(size as u32, size as u32),
        Rgba([224, 224, 224, 255]),
    );

    let grid = Rgba([204, 204, 204, 255]);
    for line in 1..(size / cell) {
        let offset = (line * cell) as f32;
        draw_line_segment_mut(
            canvas,
            (x as f32 + offset, y as f32),
            (x as f32 + offset, (y + size) as f32),
            grid,
        );
        draw_line_segment_mut(
            canvas,
            (x as f32, y as f32 + offset),
            ((x + size) as f32, y as f32 + offset),
            grid,
        );
    }

    let (cx, cy) = (x + size / 2, y + size / 2);
    let pin = Rgba([239, 68, 68, 255]);
    draw_filled_circle_mut(canvas, (cx, cy - 5), 4, pin);
    draw_polygon_mut(
        canvas,
        &[
            Point::new(cx, cy),
            Point::new(cx - 4, cy - 2),
            Point::new(cx + 4, cy - 2),
        ],
        pin,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_canvas(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn test_gradient_darkens_bottom_rows_progressively() {
        let mut canvas = gray_canvas(8, 100);
        darken_bottom(&mut canvas, 100);

        let top = canvas.get_pixel(0, 0).0[0];
        let middle = canvas.get_pixel(0, 50).0[0];
        let bottom = canvas.get_pixel(0, 99).0[0];

        assert_eq!(top, 128, "the very top of the band is untouched");
        assert!(middle < top);
        assert!(bottom < middle, "darkness must increase toward the bottom");
    }

    #[test]
    fn test_gradient_band_clamps_to_image_height() {
        let mut canvas = gray_canvas(4, 10);
        // Must not underflow or panic with a band taller than the image.
        darken_bottom(&mut canvas, 250);
        assert!(canvas.get_pixel(0, 9).0[0] < 128);
    }

    #[test]
    fn test_text_leaves_ink_and_clips_safely() {
        let mut canvas = gray_canvas(64, 16);
        draw_text(&mut canvas, "A", 2, 2, 1, false, [255, 255, 255, 255]);
        let inked = canvas.pixels().filter(|p| p.0[0] == 255).count();
        assert!(inked > 0, "glyph should have left white pixels");

        // Drawing past the edges must not panic.
        draw_text(&mut canvas, "edge", -5, -5, 2, true, [255, 255, 255, 255]);
        draw_text(&mut canvas, "edge", 60, 14, 2, true, [255, 255, 255, 255]);
    }

    #[test]
    fn test_non_ascii_advances_without_ink() {
        let mut blank = gray_canvas(32, 16);
        draw_text(&mut blank, "\u{0926}", 0, 0, 1, false, [255, 255, 255, 255]);
        assert!(blank.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_map_placeholder_paints_tile_and_pin() {
        let mut canvas = gray_canvas(140, 140);
        draw_map_placeholder(&mut canvas, 20, 20, 100, 25);

        assert_eq!(canvas.get_pixel(25, 25).0, [224, 224, 224, 255]);
        // Pin center sits just above the tile midpoint.
        assert_eq!(canvas.get_pixel(70, 65).0, [239, 68, 68, 255]);
    }
}
