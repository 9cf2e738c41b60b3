use std::path::Path;

use image::RgbaImage;

use crate::foundation::core::{Raster, Rgba8};
use crate::foundation::error::{SplitError, SplitResult};

/// Read and decode the source image at `path`.
pub fn load_source(path: &Path) -> SplitResult<Raster<Rgba8>> {
    let bytes = std::fs::read(path)
        .map_err(|e| SplitError::decode(format!("read '{}': {e}", path.display())))?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|e| SplitError::decode(format!("'{}': {e}", path.display())))?
        .to_rgba8();
    to_raster(rgba)
}

/// Decode encoded image bytes into straight-alpha RGBA8.
///
/// Any container the `image` crate recognizes is accepted; sources without an alpha channel
/// decode as opaque and deeper sources are reduced to 8 bits.
pub fn decode_source(bytes: &[u8]) -> SplitResult<Raster<Rgba8>> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| SplitError::decode(format!("decode image from memory: {e}")))?
        .to_rgba8();
    to_raster(rgba)
}

fn to_raster(rgba: RgbaImage) -> SplitResult<Raster<Rgba8>> {
    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .into_raw()
        .chunks_exact(4)
        .map(|px| Rgba8::new(px[0], px[1], px[2], px[3]))
        .collect();
    Raster::from_vec(width, height, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/io/decode.rs"]
mod tests;
