//! PNG and ICNS output for finished canvases.

use crate::report::Reporter;
use anyhow::{anyhow, Context, Result};
use icns::{IconFamily, IconType, OSType};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops::{self, FilterType},
    ColorType, ImageEncoder, RgbaImage,
};
use serde::Deserialize;
use std::{
    borrow::Cow,
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// File name of the untouched full-size source inside the icon directory.
pub const SOURCE_FILENAME: &str = "icon_1024.png";

/// One downsampled output of the icon set.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportEntry {
    pub filename: String,
    pub size: u32,
    /// ICNS element type used when the set is packed into an `.icns` file.
    pub ostype: String,
}

const ICONSET_JSON: &str = r#"
[
  { "filename": "icon_16x16.png", "size": 16, "ostype": "is32" },
  { "filename": "icon_16x16@2x.png", "size": 32, "ostype": "ic11" },
  { "filename": "icon_32x32.png", "size": 32, "ostype": "il32" },
  { "filename": "icon_32x32@2x.png", "size": 64, "ostype": "ic12" },
  { "filename": "icon_128x128.png", "size": 128, "ostype": "ic07" },
  { "filename": "icon_128x128@2x.png", "size": 256, "ostype": "ic13" },
  { "filename": "icon_256x256.png", "size": 256, "ostype": "ic08" },
  { "filename": "icon_256x256@2x.png", "size": 512, "ostype": "ic14" },
  { "filename": "icon_512x512.png", "size": 512, "ostype": "ic09" },
  { "filename": "icon_512x512@2x.png", "size": 1024, "ostype": "ic10" }
]
"#;

/// The macOS iconset sizes, in declaration order.
pub fn iconset_entries() -> Result<Vec<ExportEntry>> {
    serde_json::from_str(ICONSET_JSON).context("Invalid embedded iconset table")
}

/// Resize `source` to `size`×`size` with a Lanczos3 filter.
///
/// A request for the source's own size borrows the source unchanged.
pub fn resize_square(source: &RgbaImage, size: u32) -> Cow<'_, RgbaImage> {
    if source.dimensions() == (size, size) {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(imageops::resize(source, size, size, FilterType::Lanczos3))
    }
}

/// Write every entry plus the full-size source into `out_dir`.
///
/// The directory is created if needed. Returns the written paths, source last.
pub fn export_icon_set(
    source: &RgbaImage,
    entries: &[ExportEntry],
    out_dir: &Path,
    reporter: &Reporter,
) -> Result<Vec<PathBuf>> {
    create_dir_all(out_dir)
        .with_context(|| format!("Can't create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(entries.len() + 1);

    for entry in entries {
        let resized = resize_square(source, entry.size);
        let path = out_dir.join(&entry.filename);
        save_png(&resized, &path)?;
        reporter.done(format!("{} ({}x{})", entry.filename, entry.size, entry.size));
        written.push(path);
    }

    let source_path = out_dir.join(SOURCE_FILENAME);
    save_png(source, &source_path)?;
    reporter.done(format!(
        "{SOURCE_FILENAME} ({}x{})",
        source.width(),
        source.height()
    ));
    written.push(source_path);

    Ok(written)
}

/// Pack the icon set into a single `.icns` file at `path`.
pub fn write_icns(
    source: &RgbaImage,
    entries: &[ExportEntry],
    path: &Path,
    reporter: &Reporter,
) -> Result<()> {
    let mut family = IconFamily::new();

    for entry in entries {
        let resized = resize_square(source, entry.size);
        let mut buf = Vec::new();
        write_png(resized.as_raw(), &mut buf, entry.size, entry.size)?;
        let image = icns::Image::read_png(&buf[..])?;

        let ostype: OSType = entry
            .ostype
            .parse()
            .map_err(|_| anyhow!("Invalid OSType {:?} for {}", entry.ostype, entry.filename))?;
        let icon_type = IconType::from_ostype(ostype)
            .ok_or_else(|| anyhow!("Unsupported icon type {}", entry.ostype))?;

        family
            .add_icon_with_type(&image, icon_type)
            .with_context(|| format!("Can't add {} to Icns Family", entry.filename))?;
    }

    let file = File::create(path).with_context(|| format!("Can't create {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    family.write(&mut out_file)?;
    out_file.flush()?;

    reporter.done(format!("{}", path.display()));
    Ok(())
}

/// Save an RGBA canvas as a PNG file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}
