//! Pixel-level drawing primitives on top of [`image::RgbaImage`].
//!
//! Nothing here anti-aliases. Integer coordinates name pixel centres, shapes are
//! sampled there and written straight into the target (no blending) unless the
//! function says otherwise. Coordinates outside the canvas are silently clipped.

use crate::superellipse::Point;
use image::{Rgba, RgbaImage};

/// Fully transparent black, the starting state of every layer.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Allocate a transparent canvas.
pub fn new_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, TRANSPARENT)
}

/// Write a pixel if it lies on the canvas.
pub fn put_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < canvas.width() as u64 && (y as u64) < canvas.height() as u64
    {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Paint a vertical linear gradient over the half-open box `[x0, x1) × [y0, y1)`.
///
/// Each scanline `y` gets `top + (bottom - top) * (y - y0) / (y1 - y0)` per channel,
/// truncated towards zero, fully opaque. The first row is exactly `top`; the last
/// row is within one unit of `bottom`.
pub fn draw_vertical_gradient(
    canvas: &mut RgbaImage,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    top: [u8; 3],
    bottom: [u8; 3],
) {
    if y1 <= y0 || x1 <= x0 {
        return;
    }

    let span = (y1 - y0) as f64;
    let x_end = x1.min(canvas.width());
    let y_end = y1.min(canvas.height());

    for y in y0..y_end {
        let ratio = (y - y0) as f64 / span;
        let mut color = [0u8; 4];
        for c in 0..3 {
            let start = top[c] as f64;
            let end = bottom[c] as f64;
            color[c] = (start + (end - start) * ratio) as u8;
        }
        color[3] = 255;

        for x in x0..x_end {
            canvas.put_pixel(x, y, Rgba(color));
        }
    }
}

/// Fill a closed polygon using the even-odd rule.
///
/// Pixel `(x, y)` is covered when the half-open spans `[left, right)` crossing
/// row `y` contain `x`. Fewer than three points draw nothing.
pub fn fill_polygon(canvas: &mut RgbaImage, points: &[Point], color: Rgba<u8>) {
    if points.len() < 3 {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });

    let first_row = (min_y.floor() as i64).max(0);
    let last_row = (max_y.ceil() as i64).min(canvas.height() as i64 - 1);
    let mut crossings = Vec::new();

    for row in first_row..=last_row {
        let sample_y = row as f64;
        crossings.clear();

        for (i, &(xa, ya)) in points.iter().enumerate() {
            let (xb, yb) = points[(i + 1) % points.len()];
            if (ya <= sample_y && sample_y < yb) || (yb <= sample_y && sample_y < ya) {
                crossings.push(xa + (sample_y - ya) * (xb - xa) / (yb - ya));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = span[0].ceil() as i64;
            let end = span[1].ceil() as i64;
            for x in start..end {
                put_pixel(canvas, x, row, color);
            }
        }
    }
}

/// Trace a 1-pixel closed outline through `points`.
pub fn outline_polygon(canvas: &mut RgbaImage, points: &[Point], color: Rgba<u8>) {
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        draw_segment(canvas, from, to, color);
    }
}

/// Draw a straight line `width` pixels thick.
///
/// Both endpoints are painted. Thick lines are filled as a quad extended by
/// `width / 2` on either side of the centre line and half a pixel past each end;
/// a width of 0 or 1 uses a plain Bresenham segment.
pub fn draw_line(canvas: &mut RgbaImage, from: Point, to: Point, color: Rgba<u8>, width: u32) {
    if width <= 1 {
        draw_segment(canvas, from, to, color);
        return;
    }

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length == 0.0 {
        draw_segment(canvas, from, to, color);
        return;
    }

    let half = width as f64 / 2.0;
    let (nx, ny) = (-dy / length * half, dx / length * half);
    let (ex, ey) = (dx / length * 0.5, dy / length * 0.5);
    let (start, end) = ((from.0 - ex, from.1 - ey), (to.0 + ex, to.1 + ey));
    let quad = [
        (start.0 + nx, start.1 + ny),
        (end.0 + nx, end.1 + ny),
        (end.0 - nx, end.1 - ny),
        (start.0 - nx, start.1 - ny),
    ];
    fill_polygon(canvas, &quad, color);
}

/// Fill the inclusive box `[x0, y0, x1, y1]` with quarter-circle corners.
///
/// The radius is clamped to half of the shorter side.
pub fn fill_rounded_rect(canvas: &mut RgbaImage, bounds: [i64; 4], radius: i64, color: Rgba<u8>) {
    let [x0, y0, x1, y1] = bounds;
    if x1 < x0 || y1 < y0 {
        return;
    }

    let r = radius.clamp(0, ((x1 - x0) / 2).min((y1 - y0) / 2));
    let r_sq = r * r;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let cx = x.clamp(x0 + r, x1 - r);
            let cy = y.clamp(y0 + r, y1 - r);
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r_sq {
                put_pixel(canvas, x, y, color);
            }
        }
    }
}

/// Clear every pixel of `canvas` whose counterpart in `mask` is fully transparent.
pub fn apply_mask(canvas: &mut RgbaImage, mask: &RgbaImage) {
    for (pixel, coverage) in canvas.pixels_mut().zip(mask.pixels()) {
        if coverage[3] == 0 {
            *pixel = TRANSPARENT;
        }
    }
}

/// Composite `src` over `dst` (Porter-Duff source-over).
///
/// Channels are blended in `f32` on straight (non-premultiplied) alpha and rounded
/// to the nearest integer. A transparent source leaves `dst` untouched and an
/// opaque source replaces it exactly.
pub fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mut out = [0u8; 4];
    for c in 0..3 {
        let blended = (src[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        out[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;

    Rgba(out)
}

/// Blend `color` onto one pixel with its alpha scaled by `coverage` (0.0 to 1.0).
pub fn blend_coverage(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }

    let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    let src = Rgba([color[0], color[1], color[2], alpha]);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    *pixel = blend_pixel(*pixel, src);
}

// Bresenham between the rounded endpoints.
fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point, color: Rgba<u8>) {
    let (mut x, mut y) = (from.0.round() as i64, from.1.round() as i64);
    let (x_end, y_end) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x_end - x).abs();
    let dy = -(y_end - y).abs();
    let sx = if x < x_end { 1 } else { -1 };
    let sy = if y < y_end { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(canvas, x, y, color);
        if x == x_end && y == y_end {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn covered(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p[3] != 0).count()
    }

    #[test]
    fn gradient_endpoints() {
        let mut canvas = new_canvas(8, 400);
        draw_vertical_gradient(&mut canvas, (0, 0, 8, 400), [13, 148, 136], [16, 185, 129]);

        assert_eq!(*canvas.get_pixel(0, 0), Rgba([13, 148, 136, 255]));
        let last = canvas.get_pixel(7, 399);
        for (c, want) in [16u8, 185, 129].into_iter().enumerate() {
            assert!(
                (last[c] as i16 - want as i16).abs() <= 1,
                "channel {c}: {} vs {want}",
                last[c]
            );
        }
    }

    #[test]
    fn gradient_rows_are_uniform_and_monotonic() {
        let mut canvas = new_canvas(600, 400);
        draw_vertical_gradient(&mut canvas, (0, 0, 600, 400), [245; 3], [255; 3]);

        let mut previous = 0u8;
        for y in 0..400 {
            let first = *canvas.get_pixel(0, y);
            assert_eq!(first, *canvas.get_pixel(599, y));
            assert!(first[0] >= previous);
            previous = first[0];
        }
    }

    #[test]
    fn gradient_clips_to_canvas() {
        let mut canvas = new_canvas(4, 4);
        draw_vertical_gradient(&mut canvas, (2, 2, 100, 100), [0; 3], [255; 3]);
        assert_eq!(canvas.get_pixel(1, 1)[3], 0);
        assert_eq!(canvas.get_pixel(3, 3)[3], 255);
    }

    #[test]
    fn fills_axis_aligned_square() {
        let mut canvas = new_canvas(20, 20);
        let square = [(2.0, 2.0), (12.0, 2.0), (12.0, 12.0), (2.0, 12.0)];
        fill_polygon(&mut canvas, &square, WHITE);

        assert_eq!(covered(&canvas), 100);
        assert_eq!(*canvas.get_pixel(2, 2), WHITE);
        assert_eq!(*canvas.get_pixel(11, 11), WHITE);
        assert_eq!(canvas.get_pixel(12, 12)[3], 0);
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut canvas = new_canvas(10, 10);
        fill_polygon(&mut canvas, &[(1.0, 1.0), (8.0, 8.0)], WHITE);
        assert_eq!(covered(&canvas), 0);
    }

    #[test]
    fn polygon_partly_off_canvas_is_clipped() {
        let mut canvas = new_canvas(10, 10);
        let big = [(-5.0, -5.0), (15.0, -5.0), (15.0, 15.0), (-5.0, 15.0)];
        fill_polygon(&mut canvas, &big, WHITE);
        assert_eq!(covered(&canvas), 100);
    }

    #[test]
    fn outline_leaves_interior_empty() {
        let mut canvas = new_canvas(20, 20);
        let square = [(2.0, 2.0), (12.0, 2.0), (12.0, 12.0), (2.0, 12.0)];
        outline_polygon(&mut canvas, &square, WHITE);

        assert_eq!(*canvas.get_pixel(2, 7), WHITE);
        assert_eq!(*canvas.get_pixel(12, 12), WHITE);
        assert_eq!(canvas.get_pixel(7, 7)[3], 0);
        assert_eq!(covered(&canvas), 40);
    }

    #[test]
    fn thick_horizontal_line_spans_width_rows() {
        let mut canvas = new_canvas(40, 20);
        draw_line(&mut canvas, (5.0, 10.0), (30.0, 10.0), WHITE, 3);

        for y in 9..=11 {
            assert_eq!(*canvas.get_pixel(15, y), WHITE, "row {y}");
        }
        assert_eq!(canvas.get_pixel(15, 8)[3], 0);
        assert_eq!(canvas.get_pixel(15, 12)[3], 0);
    }

    #[test]
    fn thick_line_paints_both_endpoints() {
        let mut canvas = new_canvas(40, 40);
        draw_line(&mut canvas, (5.0, 10.0), (30.0, 10.0), WHITE, 3);
        assert_eq!(*canvas.get_pixel(5, 10), WHITE);
        assert_eq!(*canvas.get_pixel(30, 10), WHITE);
        assert_eq!(canvas.get_pixel(4, 10)[3], 0);
        assert_eq!(canvas.get_pixel(31, 10)[3], 0);

        draw_line(&mut canvas, (20.0, 20.0), (20.0, 35.0), WHITE, 3);
        assert_eq!(*canvas.get_pixel(20, 20), WHITE);
        assert_eq!(*canvas.get_pixel(20, 35), WHITE);
        assert_eq!(canvas.get_pixel(20, 19)[3], 0);
        assert_eq!(canvas.get_pixel(20, 36)[3], 0);
    }

    #[test]
    fn rounded_rect_cuts_corners() {
        let mut canvas = new_canvas(50, 50);
        fill_rounded_rect(&mut canvas, [5, 5, 44, 44], 10, WHITE);

        assert_eq!(canvas.get_pixel(5, 5)[3], 0);
        assert_eq!(*canvas.get_pixel(25, 5), WHITE);
        assert_eq!(*canvas.get_pixel(5, 25), WHITE);
        assert_eq!(*canvas.get_pixel(44, 25), WHITE);
        assert_eq!(canvas.get_pixel(45, 25)[3], 0);
    }

    #[test]
    fn rounded_rect_with_zero_radius_is_a_box() {
        let mut canvas = new_canvas(10, 10);
        fill_rounded_rect(&mut canvas, [0, 0, 3, 1], 0, WHITE);
        assert_eq!(covered(&canvas), 8);
    }

    #[test]
    fn mask_clears_uncovered_pixels() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        let mut mask = new_canvas(4, 4);
        fill_rounded_rect(&mut mask, [0, 0, 1, 3], 0, WHITE);

        apply_mask(&mut canvas, &mask);

        assert_eq!(*canvas.get_pixel(1, 2), WHITE);
        assert_eq!(*canvas.get_pixel(2, 2), TRANSPARENT);
        assert_eq!(covered(&canvas), 8);
    }

    #[test]
    fn blend_fast_paths() {
        let dst = Rgba([10, 20, 30, 255]);
        assert_eq!(blend_pixel(dst, Rgba([200, 0, 0, 0])), dst);
        assert_eq!(blend_pixel(dst, Rgba([1, 2, 3, 255])), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn blend_onto_transparent_keeps_source() {
        let src = Rgba([255, 255, 255, 180]);
        assert_eq!(blend_pixel(TRANSPARENT, src), src);
    }

    #[test]
    fn blend_half_white_over_black() {
        let out = blend_pixel(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
    }

    #[test]
    fn coverage_blend_ignores_out_of_bounds() {
        let mut canvas = new_canvas(2, 2);
        blend_coverage(&mut canvas, -1, 0, WHITE, 1.0);
        blend_coverage(&mut canvas, 2, 2, WHITE, 1.0);
        blend_coverage(&mut canvas, 1, 1, WHITE, 1.0);
        assert_eq!(covered(&canvas), 1);
    }
}
