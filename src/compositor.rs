//! Layered alpha-over composition.
//!
//! Every element is drawn in isolation on its own transparent layer, then merged
//! onto a single accumulator. Layers are applied strictly in the order given.

use crate::raster::{blend_pixel, new_canvas};
use anyhow::{bail, Result};
use image::RgbaImage;

/// Merge `layer` onto `accumulator` with source-over compositing.
///
/// Both buffers must have identical dimensions.
pub fn merge(accumulator: &mut RgbaImage, layer: &RgbaImage) -> Result<()> {
    if accumulator.dimensions() != layer.dimensions() {
        let (aw, ah) = accumulator.dimensions();
        let (lw, lh) = layer.dimensions();
        bail!("Layer is {lw}x{lh} but the canvas is {aw}x{ah}");
    }

    for (dst, src) in accumulator.pixels_mut().zip(layer.pixels()) {
        *dst = blend_pixel(*dst, *src);
    }

    Ok(())
}

/// Fold `layers` into one image.
///
/// `render` draws a single layer onto a fresh transparent canvas of the requested
/// size; the result is merged before the next layer is rendered.
pub fn compose<L, F>(width: u32, height: u32, layers: &[L], mut render: F) -> Result<RgbaImage>
where
    L: Copy,
    F: FnMut(L, &mut RgbaImage),
{
    layers
        .iter()
        .try_fold(new_canvas(width, height), |mut accumulator, &layer| {
            let mut canvas = new_canvas(width, height);
            render(layer, &mut canvas);
            merge(&mut accumulator, &canvas)?;
            Ok(accumulator)
        })
}
