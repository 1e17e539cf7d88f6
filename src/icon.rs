//! App icon: a teal squircle holding a television with a play glyph and a
//! bookmark ribbon, rendered at 1024×1024 and exported as a macOS iconset.

use crate::compositor::compose;
use crate::export::{export_icon_set, iconset_entries, write_icns};
use crate::raster::{
    apply_mask, draw_line, draw_vertical_gradient, fill_polygon, fill_rounded_rect, new_canvas,
    outline_polygon,
};
use crate::report::Reporter;
use crate::superellipse::{squircle, Point};
use anyhow::Result;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Drawing constants for the icon.
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub size: u32,
    pub gradient_top: [u8; 3],
    pub gradient_bottom: [u8; 3],
    /// Inset of the squircle from the canvas edge.
    pub margin: f64,
    /// Number of 1-px rings forming the darkened inner edge.
    pub shadow_rings: u32,
    /// Alpha of the outermost ring; inner rings fade linearly.
    pub shadow_alpha: u8,
    /// Screen insets as fractions of `size`.
    pub screen_side: f64,
    pub screen_top: f64,
    pub screen_bottom: f64,
    pub screen_radius: i64,
    pub screen_color: Rgba<u8>,
    pub stand_top_width: i64,
    pub stand_bottom_width: i64,
    pub stand_height: i64,
    /// Gap between the screen's bottom edge and the stand.
    pub stand_gap: i64,
    pub base_width: i64,
    pub base_height: i64,
    pub base_gap: i64,
    pub base_radius: i64,
    pub stand_color: Rgba<u8>,
    pub play_size: i64,
    /// Rightward shift that centres the triangle optically.
    pub play_nudge: i64,
    pub play_color: Rgba<u8>,
    pub ribbon_width: i64,
    pub ribbon_height: i64,
    /// Distance from the screen's right edge to the ribbon's left edge.
    pub ribbon_inset: i64,
    /// How far the ribbon pokes above the screen.
    pub ribbon_lift: i64,
    pub ribbon_notch: i64,
    pub ribbon_color: Rgba<u8>,
    pub ribbon_highlight: Rgba<u8>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            gradient_top: [13, 148, 136],
            gradient_bottom: [16, 185, 129],
            margin: 20.0,
            shadow_rings: 6,
            shadow_alpha: 30,
            screen_side: 0.22,
            screen_top: 0.24,
            screen_bottom: 0.72,
            screen_radius: 40,
            screen_color: Rgba([255, 255, 255, 230]),
            stand_top_width: 80,
            stand_bottom_width: 140,
            stand_height: 30,
            stand_gap: 15,
            base_width: 200,
            base_height: 8,
            base_gap: 5,
            base_radius: 4,
            stand_color: Rgba([255, 255, 255, 180]),
            play_size: 70,
            play_nudge: 10,
            play_color: Rgba([13, 148, 136, 160]),
            ribbon_width: 55,
            ribbon_height: 100,
            ribbon_inset: 80,
            ribbon_lift: 20,
            ribbon_notch: 20,
            ribbon_color: Rgba([6, 95, 70, 230]),
            ribbon_highlight: Rgba([255, 255, 255, 60]),
        }
    }
}

/// Inclusive pixel bounds of the television screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl IconConfig {
    pub fn screen(&self) -> Screen {
        let size = self.size as f64;
        let side = (size * self.screen_side) as i64;
        Screen {
            left: side,
            top: (size * self.screen_top) as i64,
            right: self.size as i64 - side,
            bottom: (size * self.screen_bottom) as i64,
        }
    }

    fn center_x(&self) -> i64 {
        self.size as i64 / 2
    }

    fn stand_top(&self) -> i64 {
        self.screen().bottom + self.stand_gap
    }
}

/// The icon's visual elements, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconLayer {
    Background,
    ShadowEdge,
    Screen,
    Stand,
    Base,
    PlayGlyph,
    Ribbon,
}

impl IconLayer {
    /// Compositing order. Later layers cover earlier ones.
    pub const ORDER: [IconLayer; 7] = [
        IconLayer::Background,
        IconLayer::ShadowEdge,
        IconLayer::Screen,
        IconLayer::Stand,
        IconLayer::Base,
        IconLayer::PlayGlyph,
        IconLayer::Ribbon,
    ];

    /// Draw this element onto an empty layer.
    pub fn draw(self, cfg: &IconConfig, layer: &mut RgbaImage) {
        match self {
            IconLayer::Background => draw_background(cfg, layer),
            IconLayer::ShadowEdge => draw_shadow_edge(cfg, layer),
            IconLayer::Screen => {
                let s = cfg.screen();
                fill_rounded_rect(
                    layer,
                    [s.left, s.top, s.right, s.bottom],
                    cfg.screen_radius,
                    cfg.screen_color,
                );
            }
            IconLayer::Stand => fill_polygon(layer, &stand_outline(cfg), cfg.stand_color),
            IconLayer::Base => {
                let cx = cfg.center_x();
                let y = cfg.stand_top() + cfg.stand_height + cfg.base_gap;
                fill_rounded_rect(
                    layer,
                    [
                        cx - cfg.base_width / 2,
                        y,
                        cx + cfg.base_width / 2,
                        y + cfg.base_height,
                    ],
                    cfg.base_radius,
                    cfg.stand_color,
                );
            }
            IconLayer::PlayGlyph => fill_polygon(layer, &play_outline(cfg), cfg.play_color),
            IconLayer::Ribbon => draw_ribbon(cfg, layer),
        }
    }
}

/// Render the full-size icon.
pub fn render_icon(cfg: &IconConfig) -> Result<RgbaImage> {
    compose(cfg.size, cfg.size, &IconLayer::ORDER, |layer, canvas| {
        layer.draw(cfg, canvas)
    })
}

/// Render the icon and export the iconset into `out_dir`.
///
/// With `icns` set the same sizes are also packed into that file.
pub fn generate_icon(
    out_dir: &Path,
    cfg: &IconConfig,
    icns: Option<&Path>,
    reporter: &Reporter,
) -> Result<Vec<PathBuf>> {
    reporter.step("Generating app icon...");
    let icon = render_icon(cfg)?;
    let entries = iconset_entries()?;

    let written = export_icon_set(&icon, &entries, out_dir, reporter)?;

    if let Some(path) = icns {
        reporter.step("Packing icon.icns...");
        write_icns(&icon, &entries, path, reporter)?;
    }

    reporter.step(format!("All icons saved to: {}", out_dir.display()));
    Ok(written)
}

fn draw_background(cfg: &IconConfig, layer: &mut RgbaImage) {
    draw_vertical_gradient(
        layer,
        (0, 0, cfg.size, cfg.size),
        cfg.gradient_top,
        cfg.gradient_bottom,
    );

    let mut mask = new_canvas(cfg.size, cfg.size);
    fill_polygon(&mut mask, &squircle(cfg.size, cfg.margin), Rgba([255; 4]));
    apply_mask(layer, &mask);
}

fn draw_shadow_edge(cfg: &IconConfig, layer: &mut RgbaImage) {
    let rings = cfg.shadow_rings;
    for offset in 0..rings {
        let fade = 1.0 - offset as f64 / rings as f64;
        let alpha = (cfg.shadow_alpha as f64 * fade) as u8;
        let ring = squircle(cfg.size, cfg.margin + offset as f64);
        outline_polygon(layer, &ring, Rgba([0, 0, 0, alpha]));
    }
}

fn stand_outline(cfg: &IconConfig) -> [Point; 4] {
    let cx = cfg.center_x();
    let top = cfg.stand_top();
    let bottom = top + cfg.stand_height;
    let (half_top, half_bottom) = (cfg.stand_top_width / 2, cfg.stand_bottom_width / 2);

    [
        ((cx - half_top) as f64, top as f64),
        ((cx + half_top) as f64, top as f64),
        ((cx + half_bottom) as f64, bottom as f64),
        ((cx - half_bottom) as f64, bottom as f64),
    ]
}

fn play_outline(cfg: &IconConfig) -> [Point; 3] {
    let s = cfg.screen();
    let cx = (s.left + s.right) / 2;
    let cy = (s.top + s.bottom) / 2;
    let half = cfg.play_size / 2;
    let left = cx - half + cfg.play_nudge;

    [
        (left as f64, (cy - half) as f64),
        ((cx + half + cfg.play_nudge) as f64, cy as f64),
        (left as f64, (cy + half) as f64),
    ]
}

fn draw_ribbon(cfg: &IconConfig, layer: &mut RgbaImage) {
    let s = cfg.screen();
    let x = s.right - cfg.ribbon_inset;
    let y = s.top - cfg.ribbon_lift;
    let (w, h) = (cfg.ribbon_width, cfg.ribbon_height);

    let body = [
        (x as f64, y as f64),
        ((x + w) as f64, y as f64),
        ((x + w) as f64, (y + h) as f64),
        ((x + w / 2) as f64, (y + h - cfg.ribbon_notch) as f64),
        (x as f64, (y + h) as f64),
    ];
    fill_polygon(layer, &body, cfg.ribbon_color);

    // Highlight along the left edge, stopping short of the tail.
    draw_line(
        layer,
        ((x + 2) as f64, y as f64),
        ((x + 2) as f64, (y + h - 5) as f64),
        cfg.ribbon_highlight,
        3,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(actual: Rgba<u8>, expected: [u8; 4]) -> bool {
        actual
            .0
            .iter()
            .zip(expected.iter())
            .all(|(a, e)| (*a as i16 - *e as i16).abs() <= 1)
    }

    #[test]
    fn layers_compose_back_to_front() {
        assert_eq!(
            IconLayer::ORDER,
            [
                IconLayer::Background,
                IconLayer::ShadowEdge,
                IconLayer::Screen,
                IconLayer::Stand,
                IconLayer::Base,
                IconLayer::PlayGlyph,
                IconLayer::Ribbon,
            ]
        );
    }

    #[test]
    fn default_geometry() {
        let cfg = IconConfig::default();
        assert_eq!(
            cfg.screen(),
            Screen {
                left: 225,
                top: 245,
                right: 799,
                bottom: 737
            }
        );
        assert_eq!(
            stand_outline(&cfg),
            [(472.0, 752.0), (552.0, 752.0), (582.0, 782.0), (442.0, 782.0)]
        );
        assert_eq!(
            play_outline(&cfg),
            [(487.0, 456.0), (557.0, 491.0), (487.0, 526.0)]
        );
    }

    #[test]
    fn renders_expected_regions() {
        let icon = render_icon(&IconConfig::default()).unwrap();
        assert_eq!(icon.dimensions(), (1024, 1024));

        // Outside the squircle.
        assert_eq!(icon.get_pixel(0, 0)[3], 0);
        assert_eq!(icon.get_pixel(1023, 1023)[3], 0);

        // Bare gradient between the top edge and the screen.
        assert_eq!(*icon.get_pixel(512, 100), Rgba([13, 151, 135, 255]));

        // Translucent white screen over the gradient.
        assert!(near(*icon.get_pixel(300, 400), [231, 246, 243, 255]));

        // Play glyph is teal-tinted, ribbon is dark green.
        let play = icon.get_pixel(500, 491);
        assert!(play[0] < 150 && play[1] > play[0]);
        let ribbon = icon.get_pixel(740, 260);
        assert!(ribbon[0] < 60 && ribbon[1] > ribbon[0]);

        // Stand and base lighten the gradient beneath the screen.
        assert!(icon.get_pixel(512, 770)[0] > 150);
        assert!(icon.get_pixel(512, 790)[0] > 150);
    }

    #[test]
    fn shadow_darkens_inner_edge() {
        let icon = render_icon(&IconConfig::default()).unwrap();
        let edge = icon.get_pixel(512, 22);
        let inside = icon.get_pixel(512, 40);
        assert_eq!(edge[3], 255);
        assert!(edge[1] < inside[1]);
    }

    #[test]
    fn rendering_is_reproducible() {
        let cfg = IconConfig::default();
        assert_eq!(render_icon(&cfg).unwrap(), render_icon(&cfg).unwrap());
    }

    #[test]
    fn ribbon_highlight_replaces_ribbon_colour_on_its_layer() {
        let cfg = IconConfig::default();
        let mut layer = new_canvas(cfg.size, cfg.size);
        IconLayer::Ribbon.draw(&cfg, &mut layer);

        assert_eq!(*layer.get_pixel(721, 260), cfg.ribbon_highlight);
        assert_eq!(*layer.get_pixel(740, 260), cfg.ribbon_color);
        // Notch between the two tails.
        assert_eq!(layer.get_pixel(746, 320)[3], 0);
    }
}
