use crate::foundation::core::{MAX_LEVEL, Raster, Rgba4, Rgba8};
use crate::foundation::error::{SplitError, SplitResult};
use crate::scan::scanner::Layers;

/// Composite `front` over `back` and return straight-alpha RGBA8.
///
/// Exact on 4-bit levels: with `F = 15`, composite alpha is `(F^2 - (F - af)(F - ab)) / F^2`
/// and premultiplied colour is `(F af cf + (F - af) ab cb) / F^3`. Results are rounded to the
/// nearest 8-bit value; a fully clear composite is transparent black.
pub fn over(front: Rgba4, back: Rgba4) -> Rgba8 {
    let full = u32::from(MAX_LEVEL);
    let af = u32::from(front.a.min(MAX_LEVEL));
    let ab = u32::from(back.a.min(MAX_LEVEL));
    let alpha = full * full - (full - af) * (full - ab);
    if alpha == 0 {
        return Rgba8::transparent();
    }

    let channel = |cf: u8, cb: u8| -> u8 {
        let cf = u32::from(cf.min(MAX_LEVEL));
        let cb = u32::from(cb.min(MAX_LEVEL));
        let num = full * af * cf + (full - af) * ab * cb;
        let den = full * alpha;
        ((255 * num + den / 2) / den) as u8
    };

    Rgba8::new(
        channel(front.r, back.r),
        channel(front.g, back.g),
        channel(front.b, back.b),
        ((255 * alpha + full * full / 2) / (full * full)) as u8,
    )
}

/// Pixel-wise [`over`] of both layers.
pub fn composite_layers(layers: &Layers) -> SplitResult<Raster<Rgba8>> {
    let (front, back) = (&layers.front, &layers.back);
    if front.width() != back.width() || front.height() != back.height() {
        return Err(SplitError::validation(format!(
            "layer sizes differ: front {}x{}, back {}x{}",
            front.width(),
            front.height(),
            back.width(),
            back.height()
        )));
    }
    let pixels = front
        .pixels()
        .iter()
        .zip(back.pixels())
        .map(|(&f, &b)| over(f, b))
        .collect();
    Raster::from_vec(front.width(), front.height(), pixels)
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
