use crate::config::{AlphaOrder, SearchStrategy, SplitOpts};
use crate::foundation::core::{Component, MAX_LEVEL, Rgba4};
use crate::foundation::error::{SplitError, SplitResult};
use crate::model::error_model::{AlphaStage, ColorStage, Ise};
use crate::model::taps::Neighborhood;
use crate::search::color::ColorChoice;

/// The winning front/back pair for one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelSolution {
    pub front: Rgba4,
    pub back: Rgba4,
    /// Summed R, G and B error of the winning trial.
    pub error: Ise,
    /// Alpha trials actually scored.
    pub alpha_trials: u32,
}

/// Per-pixel search over `(A_f, A_b)` and, per channel, `(C_f, C_b)`.
#[derive(Clone, Copy, Debug)]
pub struct Optimizer {
    strategy: SearchStrategy,
    alpha_order: AlphaOrder,
    alpha_tolerance: Option<u8>,
}

impl Optimizer {
    pub fn new(opts: &SplitOpts) -> SplitResult<Self> {
        opts.validate()?;
        Ok(Self {
            strategy: opts.strategy,
            alpha_order: opts.alpha_order,
            alpha_tolerance: opts.alpha_tolerance,
        })
    }

    /// Solve the current pixel of `nb`.
    ///
    /// Alpha pairs are visited in [`AlphaOrder::pairs`] order and replaced only on a strictly
    /// smaller total, so the first minimal pair wins.
    pub fn solve(&self, nb: &Neighborhood) -> SplitResult<PixelSolution> {
        let alpha = AlphaStage::new(&nb.taps(Component::Alpha));
        let colors = Component::COLORS.map(|c| ColorStage::new(&alpha, &nb.taps(c)));
        let current = nb.current();
        let seeds = Component::COLORS.map(|c| current.component(c) >> 4);

        let mut best: Option<(Ise, (u8, u8), [ColorChoice; 3])> = None;
        let mut scored = 0u32;
        for (af, ab) in self.alpha_order.pairs() {
            if !self.admits(current.a, af, ab) {
                continue;
            }
            scored += 1;
            let trial = alpha.trial(af, ab);
            let mut picks = [ColorChoice {
                front: 0,
                back: 0,
                error: Ise::ZERO,
            }; 3];
            for ((pick, color), &seed) in picks.iter_mut().zip(colors.iter()).zip(seeds.iter()) {
                *pick = self.strategy.search(&color.with_trial(&trial), seed);
            }
            let total: Ise = picks.iter().map(|p| p.error).sum();
            if best.as_ref().is_none_or(|(e, _, _)| total < *e) {
                best = Some((total, (af, ab), picks));
            }
        }

        let (error, (af, ab), [r, g, b]) = best.ok_or_else(|| {
            SplitError::evaluation(format!(
                "no admissible alpha trial for source alpha {}",
                current.a
            ))
        })?;
        Ok(PixelSolution {
            front: Rgba4 {
                r: r.front,
                g: g.front,
                b: b.front,
                a: af,
            },
            back: Rgba4 {
                r: r.back,
                g: g.back,
                b: b.back,
                a: ab,
            },
            error,
            alpha_trials: scored,
        })
    }

    /// Whether the composite alpha of `(af, ab)` lies within the configured tolerance of the
    /// source alpha at the current pixel.
    ///
    /// With `tolerance` in 1/15 steps the test `|s/255 - c/225| <= t/15` is checked on integers,
    /// where `c = 225 - (15 - af)(15 - ab)` is the composite alpha in 1/225 steps.
    fn admits(&self, source_alpha: u8, af: u8, ab: u8) -> bool {
        let Some(t) = self.alpha_tolerance else {
            return true;
        };
        let full = i32::from(MAX_LEVEL);
        let c = full * full - (full - i32::from(af)) * (full - i32::from(ab));
        let gap = (225 * i32::from(source_alpha) - 255 * c).abs();
        gap <= i32::from(t) * 3825
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/optimizer.rs"]
mod tests;
