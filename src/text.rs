//! Centred text labels.
//!
//! A TrueType font is preferred. When it cannot be read or parsed the label is
//! drawn with a small built-in bitmap font instead, so rendering never fails
//! because of a missing font file.

use crate::raster::blend_coverage;
use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::Path;

/// Pixel distance between the starts of two bitmap glyphs.
const BITMAP_ADVANCE: i64 = 6;
const BITMAP_HEIGHT: u32 = 7;

/// Ink bounds of a piece of text relative to its pen origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    /// Offset of the first inked column from the pen origin.
    pub left: i64,
    pub width: u32,
}

/// Font used for a text label.
pub enum LabelFont {
    TrueType { font: Font<'static>, scale: Scale },
    /// Built-in 5x7 bitmap font covering printable ASCII.
    Bitmap,
}

impl LabelFont {
    /// Load `path` at `px` pixels, falling back to the bitmap font on any failure.
    pub fn load(path: &Path, px: f32) -> Self {
        match Self::load_truetype(path, px) {
            Ok(font) => font,
            Err(err) => {
                eprintln!("warning: {err:#}; falling back to the built-in bitmap font");
                LabelFont::Bitmap
            }
        }
    }

    fn load_truetype(path: &Path, px: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Can't read font {}", path.display()))?;

        // Index 0 covers both plain .ttf files and the first face of a .ttc collection.
        let font = Font::try_from_vec_and_index(data, 0)
            .ok_or_else(|| anyhow!("{} is not a usable TrueType font", path.display()))?;

        Ok(LabelFont::TrueType {
            font,
            scale: Scale::uniform(px),
        })
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelFont::Bitmap)
    }

    /// Measure the inked area of `text`.
    pub fn measure(&self, text: &str) -> TextExtent {
        match self {
            LabelFont::TrueType { font, scale } => {
                let ascent = font.v_metrics(*scale).ascent;
                let bounds = font
                    .layout(text, *scale, point(0.0, ascent))
                    .filter_map(|glyph| glyph.pixel_bounding_box())
                    .fold(None, |acc: Option<(i32, i32)>, bb| match acc {
                        Some((lo, hi)) => Some((lo.min(bb.min.x), hi.max(bb.max.x))),
                        None => Some((bb.min.x, bb.max.x)),
                    });

                match bounds {
                    Some((lo, hi)) => TextExtent {
                        left: lo as i64,
                        width: (hi - lo) as u32,
                    },
                    None => TextExtent { left: 0, width: 0 },
                }
            }
            LabelFont::Bitmap => {
                let inked = bitmap_columns(text).filter(|&(_, bits)| bits != 0);
                let bounds = inked.fold(None, |acc: Option<(i64, i64)>, (x, _)| match acc {
                    Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                    None => Some((x, x)),
                });

                match bounds {
                    Some((lo, hi)) => TextExtent {
                        left: lo,
                        width: (hi - lo + 1) as u32,
                    },
                    None => TextExtent { left: 0, width: 0 },
                }
            }
        }
    }

    /// Draw `text` horizontally centred on the canvas with its top edge at `top`.
    ///
    /// Returns the canvas column where the ink starts.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        top: i64,
        color: Rgba<u8>,
    ) -> i64 {
        let extent = self.measure(text);
        let ink_x = (canvas.width() as i64 - extent.width as i64) / 2;
        let origin_x = ink_x - extent.left;

        match self {
            LabelFont::TrueType { font, scale } => {
                let baseline = top as f32 + font.v_metrics(*scale).ascent;
                for glyph in font.layout(text, *scale, point(origin_x as f32, baseline)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            let x = bb.min.x as i64 + gx as i64;
                            let y = bb.min.y as i64 + gy as i64;
                            blend_coverage(canvas, x, y, color, coverage);
                        });
                    }
                }
            }
            LabelFont::Bitmap => {
                for (x, bits) in bitmap_columns(text) {
                    for row in 0..BITMAP_HEIGHT {
                        if bits & (1 << row) != 0 {
                            blend_coverage(canvas, origin_x + x, top + row as i64, color, 1.0);
                        }
                    }
                }
            }
        }

        ink_x
    }
}

// Yields (column offset from the pen origin, column bits) for every glyph column.
fn bitmap_columns(text: &str) -> impl Iterator<Item = (i64, u8)> + '_ {
    text.chars().enumerate().flat_map(|(i, c)| {
        let glyph = bitmap_glyph(c);
        (0..5).map(move |col| (i as i64 * BITMAP_ADVANCE + col as i64, glyph[col]))
    })
}

fn bitmap_glyph(c: char) -> [u8; 5] {
    let index = match c {
        ' '..='~' => c as usize - ' ' as usize,
        _ => '?' as usize - ' ' as usize,
    };
    GLYPHS[index]
}

// Column-major, least significant bit is the top row.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];
