//! Superellipse ("squircle") outline generation.

use std::f64::consts::PI;

/// Shape exponent used for every squircle in the icon.
pub const SQUIRCLE_EXPONENT: f64 = 5.0;

/// Number of samples taken around the squircle outline.
pub const SQUIRCLE_STEPS: usize = 360;

/// A point in canvas space, in pixels.
pub type Point = (f64, f64);

/// Sample a closed superellipse boundary.
///
/// `theta` walks `[0, 2π)` in `steps` equal increments and each sample is
///
/// ```text
/// x = cx + rx * |cos θ|^(2/n) * sign(cos θ)
/// y = cy + ry * |sin θ|^(2/n) * sign(sin θ)
/// ```
///
/// `n = 2` gives an ellipse; larger exponents approach the bounding rectangle.
/// Callers need `steps >= 3` for the result to be a usable polygon.
pub fn superellipse_path(cx: f64, cy: f64, rx: f64, ry: f64, n: f64, steps: usize) -> Vec<Point> {
    let exponent = 2.0 / n;

    (0..steps)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / steps as f64;
            let (sin_t, cos_t) = t.sin_cos();
            let x = cx + rx * cos_t.abs().powf(exponent) * signum(cos_t);
            let y = cy + ry * sin_t.abs().powf(exponent) * signum(sin_t);
            (x, y)
        })
        .collect()
}

/// Squircle centred on a square canvas of side `size`, inset by `inset` pixels.
pub fn squircle(size: u32, inset: f64) -> Vec<Point> {
    let half = size as f64 / 2.0;
    superellipse_path(
        half,
        half,
        half - inset,
        half - inset,
        SQUIRCLE_EXPONENT,
        SQUIRCLE_STEPS,
    )
}

// Zero counts as positive so the outline passes through the axis extremes.
fn signum(v: f64) -> f64 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    // cos(π/2) is not exactly zero in floating point, and the fractional power
    // magnifies that residue near the axes.
    const MIRROR_EPS: f64 = 1e-3;

    fn contains(points: &[Point], target: Point) -> bool {
        points.iter().any(|p| {
            (p.0 - target.0).abs() < MIRROR_EPS && (p.1 - target.1).abs() < MIRROR_EPS
        })
    }

    #[test]
    fn produces_exactly_steps_points() {
        for steps in [3, 4, 17, 360] {
            let points = superellipse_path(0.0, 0.0, 10.0, 5.0, 5.0, steps);
            assert_eq!(points.len(), steps);
        }
    }

    #[test]
    fn symmetric_about_both_axes() {
        let (cx, cy) = (512.0, 512.0);
        for n in [2.0, 3.5, 5.0] {
            let points = superellipse_path(cx, cy, 300.0, 200.0, n, 360);
            for &(x, y) in &points {
                let mirrored_x = (2.0 * cx - x, y);
                let mirrored_y = (x, 2.0 * cy - y);
                assert!(contains(&points, mirrored_x), "n={n}: missing {mirrored_x:?}");
                assert!(contains(&points, mirrored_y), "n={n}: missing {mirrored_y:?}");
            }
        }
    }

    #[test]
    fn exponent_two_is_an_ellipse() {
        let points = superellipse_path(0.0, 0.0, 4.0, 2.0, 2.0, 64);
        for (x, y) in points {
            let r = (x / 4.0).powi(2) + (y / 2.0).powi(2);
            assert!((r - 1.0).abs() < 1e-9, "point ({x}, {y}) off the ellipse");
        }
    }

    #[test]
    fn starts_on_the_right_extreme() {
        let points = squircle(1024, 20.0);
        assert_eq!(points.len(), SQUIRCLE_STEPS);
        assert!((points[0].0 - 1004.0).abs() < EPS);
        assert!((points[0].1 - 512.0).abs() < EPS);
    }

    #[test]
    fn larger_exponent_bulges_towards_the_corner() {
        // Sample at 45 degrees: step 45 of 360.
        let round = superellipse_path(0.0, 0.0, 1.0, 1.0, 2.0, 360)[45];
        let square = superellipse_path(0.0, 0.0, 1.0, 1.0, 5.0, 360)[45];
        assert!(square.0 > round.0);
        assert!(square.1 > round.1);
    }
}
