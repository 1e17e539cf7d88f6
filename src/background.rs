//! DMG installer background: a light gradient, an arrow from the app icon slot to
//! the Applications slot, and a centred hint underneath.

use crate::export::save_png;
use crate::raster::{draw_line, draw_vertical_gradient, fill_polygon, new_canvas};
use crate::report::Reporter;
use crate::text::LabelFont;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

/// Font tried first for the installer hint.
pub const DEFAULT_FONT: &str = "/System/Library/Fonts/Helvetica.ttc";

/// Drawing constants for the installer background.
#[derive(Debug, Clone)]
pub struct BackgroundConfig {
    pub width: u32,
    pub height: u32,
    pub gradient_top: [u8; 3],
    pub gradient_bottom: [u8; 3],
    /// Row the arrow's shaft is centred on.
    pub arrow_y: i64,
    pub arrow_start: i64,
    /// Column of the arrow's tip.
    pub arrow_end: i64,
    pub arrow_width: u32,
    pub arrow_head: i64,
    pub arrow_color: Rgba<u8>,
    pub label: String,
    pub font_path: PathBuf,
    pub font_size: f32,
    /// Distance from the arrow's centre row to the top of the label.
    pub label_offset: i64,
    pub label_color: Rgba<u8>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            gradient_top: [245, 245, 245],
            gradient_bottom: [255, 255, 255],
            arrow_y: 210,
            arrow_start: 220,
            arrow_end: 380,
            arrow_width: 3,
            arrow_head: 12,
            arrow_color: Rgba([180, 180, 180, 255]),
            label: "Drag to Applications to install".to_string(),
            font_path: PathBuf::from(DEFAULT_FONT),
            font_size: 14.0,
            label_offset: 25,
            label_color: Rgba([160, 160, 160, 255]),
        }
    }
}

/// Render the background with an already loaded label font.
pub fn render_background(cfg: &BackgroundConfig, font: &LabelFont) -> RgbaImage {
    let mut canvas = new_canvas(cfg.width, cfg.height);

    draw_vertical_gradient(
        &mut canvas,
        (0, 0, cfg.width, cfg.height),
        cfg.gradient_top,
        cfg.gradient_bottom,
    );

    let y = cfg.arrow_y as f64;
    draw_line(
        &mut canvas,
        (cfg.arrow_start as f64, y),
        (cfg.arrow_end as f64, y),
        cfg.arrow_color,
        cfg.arrow_width,
    );

    let tip = cfg.arrow_end as f64;
    let back = (cfg.arrow_end - cfg.arrow_head) as f64;
    let spread = (cfg.arrow_head / 2) as f64;
    fill_polygon(
        &mut canvas,
        &[(tip, y), (back, y - spread), (back, y + spread)],
        cfg.arrow_color,
    );

    font.draw_centered(
        &mut canvas,
        &cfg.label,
        cfg.arrow_y + cfg.label_offset,
        cfg.label_color,
    );

    canvas
}

/// Render the background and write it to `out_path`, creating parent directories.
pub fn generate_background(
    out_path: &Path,
    cfg: &BackgroundConfig,
    reporter: &Reporter,
) -> Result<PathBuf> {
    reporter.step("Generating DMG background...");

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .with_context(|| format!("Can't create output directory {}", parent.display()))?;
    }

    let font = LabelFont::load(&cfg.font_path, cfg.font_size);
    let background = render_background(cfg, &font);
    save_png(&background, out_path)?;

    reporter.done(format!("DMG background saved to: {}", out_path.display()));
    Ok(out_path.to_path_buf())
}
