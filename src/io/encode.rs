use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::foundation::core::{Raster, Rgba4, Rgba8};
use crate::foundation::error::{SplitError, SplitResult};
use crate::scan::scanner::Layers;

/// Encode `raster` in memory as `format`.
pub fn encode_rgba(raster: &Raster<Rgba8>, format: ImageFormat) -> SplitResult<Vec<u8>> {
    let raw: Vec<u8> = raster.pixels().iter().flat_map(|px| px.to_array()).collect();
    let img = RgbaImage::from_raw(raster.width(), raster.height(), raw).ok_or_else(|| {
        SplitError::encode(format!(
            "pixel buffer does not fit {}x{}",
            raster.width(),
            raster.height()
        ))
    })?;

    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), format)
        .map_err(|e| SplitError::encode(format!("encode {format:?}: {e}")))?;
    Ok(out)
}

/// Promote a 4-bit layer to the 8-bit palette `{0, 17, ..., 255}`.
pub fn layer_to_rgba8(layer: &Raster<Rgba4>) -> Raster<Rgba8> {
    layer.map(Rgba4::to_rgba8)
}

/// Write both layers, each in the format implied by its extension.
///
/// Both images are encoded before anything touches the filesystem, and neither output path is
/// replaced until both temporary files are fully written.
#[tracing::instrument(skip_all, fields(front = %front_path.display(), back = %back_path.display()))]
pub fn write_layers(front_path: &Path, back_path: &Path, layers: &Layers) -> SplitResult<()> {
    if front_path == back_path {
        return Err(SplitError::validation(format!(
            "front and back outputs must differ, both are '{}'",
            front_path.display()
        )));
    }
    let front = encode_rgba(&layer_to_rgba8(&layers.front), format_for(front_path)?)?;
    let back = encode_rgba(&layer_to_rgba8(&layers.back), format_for(back_path)?)?;
    write_all_or_nothing(&[(front_path, front), (back_path, back)])
}

/// Encode and write a single RGBA8 image, replacing `path` only once the write has finished.
pub fn write_rgba8(path: &Path, raster: &Raster<Rgba8>) -> SplitResult<()> {
    let bytes = encode_rgba(raster, format_for(path)?)?;
    write_all_or_nothing(&[(path, bytes)])
}

fn format_for(path: &Path) -> SplitResult<ImageFormat> {
    ImageFormat::from_path(path)
        .map_err(|e| SplitError::encode(format!("output '{}': {e}", path.display())))
}

fn temp_sibling(path: &Path) -> SplitResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        SplitError::encode(format!("output '{}' has no file name", path.display()))
    })?;
    let tmp = format!(".{}.tmp-{}", name.to_string_lossy(), std::process::id());
    Ok(path.with_file_name(tmp))
}

fn write_all_or_nothing(outputs: &[(&Path, Vec<u8>)]) -> SplitResult<()> {
    let mut guard = TempFileGuard(Vec::with_capacity(outputs.len()));
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                SplitError::encode(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        let tmp = temp_sibling(path)?;
        guard.0.push(tmp.clone());
        std::fs::write(&tmp, bytes)
            .map_err(|e| SplitError::encode(format!("write '{}': {e}", tmp.display())))?;
        staged.push((tmp, *path));
    }

    let mut renamed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (tmp, path) in &staged {
        if let Err(e) = std::fs::rename(tmp, path) {
            // Earlier outputs of this batch are not valid without this one.
            for done in renamed {
                let _ = std::fs::remove_file(done);
            }
            return Err(SplitError::encode(format!(
                "move '{}' into place: {e}",
                path.display()
            )));
        }
        renamed.push(*path);
    }
    guard.0.clear();

    for (path, bytes) in outputs {
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
    }
    Ok(())
}

struct TempFileGuard(Vec<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        for path in self.0.drain(..) {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/encode.rs"]
mod tests;
