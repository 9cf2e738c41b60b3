use rayon::prelude::*;

use crate::config::SplitOpts;
use crate::foundation::core::{Raster, Rgba4, Rgba8};
use crate::foundation::error::{SplitError, SplitResult};
use crate::model::error_model::Ise;
use crate::model::taps::Neighborhood;
use crate::search::optimizer::{Optimizer, PixelSolution};

/// The two 4-bit output layers; `front` is composited over `back`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layers {
    pub front: Raster<Rgba4>,
    pub back: Raster<Rgba4>,
}

/// Aggregated counters for one split run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub width: u32,
    pub height: u32,
    /// Pixels solved.
    pub pixels: u64,
    /// Alpha trials scored across all pixels.
    pub alpha_trials: u64,
    /// Sum of every pixel's winning error.
    pub total_error: Ise,
}

impl SplitReport {
    fn record(&mut self, sol: &PixelSolution) {
        self.pixels += 1;
        self.alpha_trials += u64::from(sol.alpha_trials);
        self.total_error = self.total_error + sol.error;
    }
}

/// Front/back buffers being filled in scan order. Each cell is written once and only read after.
struct PendingLayers {
    width: u32,
    height: u32,
    cells: Vec<Option<(Rgba4, Rgba4)>>,
}

impl PendingLayers {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Decided `(front, back)` at signed coordinates; transparent off-canvas.
    fn tap(&self, x: i64, y: i64) -> SplitResult<(Rgba4, Rgba4)> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return Ok((Rgba4::transparent(), Rgba4::transparent()));
        }
        self.cells[self.index(x as u32, y as u32)].ok_or_else(|| {
            SplitError::evaluation(format!("causal tap ({x}, {y}) read before it was solved"))
        })
    }

    fn commit(&mut self, x: u32, y: u32, sol: &PixelSolution) -> SplitResult<()> {
        let idx = self.index(x, y);
        if self.cells[idx].is_some() {
            return Err(SplitError::evaluation(format!(
                "pixel ({x}, {y}) solved twice"
            )));
        }
        self.cells[idx] = Some((sol.front, sol.back));
        Ok(())
    }

    fn finish(self) -> SplitResult<Layers> {
        let mut front = Vec::with_capacity(self.cells.len());
        let mut back = Vec::with_capacity(self.cells.len());
        for (idx, cell) in self.cells.into_iter().enumerate() {
            let (f, b) = cell.ok_or_else(|| {
                SplitError::evaluation(format!("pixel index {idx} was never solved"))
            })?;
            front.push(f);
            back.push(b);
        }
        Ok(Layers {
            front: Raster::from_vec(self.width, self.height, front)?,
            back: Raster::from_vec(self.width, self.height, back)?,
        })
    }

    fn neighborhood(&self, source: &Raster<Rgba8>, x: u32, y: u32) -> SplitResult<Neighborhood> {
        let (x, y) = (i64::from(x), i64::from(y));
        let (f0, b0) = self.tap(x - 1, y - 1)?;
        let (f1, b1) = self.tap(x, y - 1)?;
        let (f2, b2) = self.tap(x - 1, y)?;
        Ok(Neighborhood {
            source: source_taps(source, x, y),
            front: [f0, f1, f2],
            back: [b0, b1, b2],
        })
    }
}

fn source_taps(source: &Raster<Rgba8>, x: i64, y: i64) -> [Rgba8; 4] {
    [
        source.tap(x - 1, y - 1),
        source.tap(x, y - 1),
        source.tap(x - 1, y),
        source.tap(x, y),
    ]
}

/// The causal neighbourhood of `(x, y)` read from finished layers.
pub fn causal_neighborhood(source: &Raster<Rgba8>, layers: &Layers, x: u32, y: u32) -> Neighborhood {
    let (x, y) = (i64::from(x), i64::from(y));
    let corners = |r: &Raster<Rgba4>| [r.tap(x - 1, y - 1), r.tap(x, y - 1), r.tap(x - 1, y)];
    Neighborhood {
        source: source_taps(source, x, y),
        front: corners(&layers.front),
        back: corners(&layers.back),
    }
}

/// Split `source` into front and back 4-bit layers.
///
/// Pixels are solved in raster order (rows top to bottom, left to right). With
/// [`SplitOpts::parallel`] each anti-diagonal is solved concurrently after the previous one is
/// committed; the result is identical to the sequential scan.
#[tracing::instrument(skip(source, opts), fields(width = source.width(), height = source.height()))]
pub fn split(source: &Raster<Rgba8>, opts: &SplitOpts) -> SplitResult<(Layers, SplitReport)> {
    let optimizer = Optimizer::new(opts)?;
    let (layers, report) = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        scan_wavefront(source, &optimizer, &pool)?
    } else {
        scan_rows(source, &optimizer)?
    };

    tracing::info!(
        pixels = report.pixels,
        alpha_trials = report.alpha_trials,
        strategy = ?opts.strategy,
        total_error = report.total_error.to_f64(),
        "split complete"
    );
    Ok((layers, report))
}

fn scan_rows(source: &Raster<Rgba8>, optimizer: &Optimizer) -> SplitResult<(Layers, SplitReport)> {
    let (w, h) = (source.width(), source.height());
    let mut pending = PendingLayers::new(w, h);
    let mut report = SplitReport {
        width: w,
        height: h,
        ..SplitReport::default()
    };

    for y in 0..h {
        for x in 0..w {
            let nb = pending.neighborhood(source, x, y)?;
            let sol = optimizer.solve(&nb)?;
            pending.commit(x, y, &sol)?;
            report.record(&sol);
        }
        tracing::debug!(row = y, rows = h, "row solved");
    }

    Ok((pending.finish()?, report))
}

fn scan_wavefront(
    source: &Raster<Rgba8>,
    optimizer: &Optimizer,
    pool: &rayon::ThreadPool,
) -> SplitResult<(Layers, SplitReport)> {
    let (w, h) = (source.width(), source.height());
    let mut pending = PendingLayers::new(w, h);
    let mut report = SplitReport {
        width: w,
        height: h,
        ..SplitReport::default()
    };
    if w == 0 || h == 0 {
        return Ok((pending.finish()?, report));
    }

    let diagonals = w + h - 1;
    for d in 0..diagonals {
        let x_lo = d.saturating_sub(h - 1);
        let x_hi = d.min(w - 1);
        let snapshot = &pending;
        let solved = pool.install(|| {
            (x_lo..=x_hi)
                .into_par_iter()
                .map(|x| -> SplitResult<(u32, u32, PixelSolution)> {
                    let y = d - x;
                    let nb = snapshot.neighborhood(source, x, y)?;
                    Ok((x, y, optimizer.solve(&nb)?))
                })
                .collect::<Vec<_>>()
        });

        // Every cell of diagonal `d` is committed before diagonal `d + 1` reads it.
        for item in solved {
            let (x, y, sol) = item?;
            pending.commit(x, y, &sol)?;
            report.record(&sol);
        }
        tracing::debug!(diagonal = d, diagonals, "diagonal solved");
    }

    Ok((pending.finish()?, report))
}

fn build_thread_pool(threads: Option<usize>) -> SplitResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SplitError::validation(
            "split threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SplitError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/scan/scanner.rs"]
mod tests;
