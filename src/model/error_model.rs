//! Integrated squared error of one channel of the front-over-back composite.
//!
//! Over the unit square spanned by the four pixel centres around a corner, source, front and
//! back are bilinear interpolants of their corner samples. The pointwise error of one channel
//! is measured on premultiplied colour plus alpha:
//!
//! ```text
//! e_c = A_s*C_s - (A_f*C_f + (1 - A_f)*A_b*C_b)
//! e_a = A_s     - (1 - (1 - A_f)*(1 - A_b))
//! ISE = integral (e_c^2 + e_a^2) du dv
//! ```
//!
//! Premultiplied colour needs no division by the composite alpha. Where that alpha is zero the
//! composite contributes no colour at all, and the chosen colours do not affect the error.
//!
//! Only the current-pixel corner of front and back is unknown. `e_c` is affine in the two
//! unknown colours for fixed alphas, so each channel's ISE is a quadratic in `(C_f, C_b)` whose
//! six coefficients are assembled in stages:
//!
//! - [`AlphaStage`]: the ten causal alpha taps; once per pixel, shared by R, G and B.
//! - [`ColorStage`]: the ten causal taps of one colour channel; once per channel per pixel.
//! - [`AlphaTrial`]: one `(A_f, A_b)` candidate; shared by R, G and B for that candidate.
//! - [`ChannelTrial`]: a colour stage combined with an alpha trial; [`ChannelTrial::result`]
//!   scores one `(C_f, C_b)` in a handful of integer operations.
//!
//! Every stage is an immutable value. All arithmetic is exact: taps are integers at scale
//! 1/255, tensors are `i64` and integrated sums are `i128`, so the ordering of candidates never
//! depends on rounding.

use std::iter::Sum;
use std::ops::Add;

use crate::foundation::core::{Component, LEVEL_SCALE};
use crate::model::patch::{Bilinear, Cubic, INTEGRAL_DENOM, ONE, Quadratic};
use crate::model::taps::{ChannelTaps, Neighborhood, Trial};

/// Exact integrated squared error, scaled by `255^6 * 7!^2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ise(i128);

impl Ise {
    pub const ZERO: Ise = Ise(0);

    pub fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i128 {
        self.0
    }

    /// The error as a true integral. For display only; never compare these.
    pub fn to_f64(self) -> f64 {
        let one = ONE as f64;
        let denom = one.powi(6) * (INTEGRAL_DENOM as f64).powi(2);
        self.0 as f64 / denom
    }
}

impl Add for Ise {
    type Output = Ise;

    fn add(self, rhs: Ise) -> Ise {
        Ise(self.0 + rhs.0)
    }
}

impl Sum for Ise {
    fn sum<I: Iterator<Item = Ise>>(iter: I) -> Ise {
        iter.fold(Ise::ZERO, Add::add)
    }
}

fn level(v: u8) -> i64 {
    i64::from(v) * i64::from(LEVEL_SCALE)
}

fn cube_of_one() -> Cubic {
    let one = Bilinear::one();
    let sq: Quadratic = one.mul(&one);
    sq.mul(&one)
}

/// Per-pixel alpha state, independent of the colour channel.
#[derive(Clone, Debug)]
pub struct AlphaStage {
    source_alpha: Bilinear,
    source_alpha_cubed: Cubic,
    front: [i64; 3],
    back: [i64; 3],
}

impl AlphaStage {
    pub fn new(alpha: &ChannelTaps) -> Self {
        let one = Bilinear::one();
        let source_alpha = Bilinear::from_corners(alpha.source);
        let sq: Quadratic = source_alpha.mul(&one);
        Self {
            source_alpha,
            source_alpha_cubed: sq.mul(&one),
            front: alpha.front,
            back: alpha.back,
        }
    }

    /// Fix the current pixel's front and back alpha levels.
    pub fn trial(&self, alpha_front: u8, alpha_back: u8) -> AlphaTrial {
        let [f0, f1, f2] = self.front;
        let [b0, b1, b2] = self.back;
        let one = Bilinear::one();
        let front_alpha = Bilinear::from_corners([f0, f1, f2, level(alpha_front)]);
        let back_alpha = Bilinear::from_corners([b0, b1, b2, level(alpha_back)]);
        let front_clear = one.sub(&front_alpha);
        let back_clear = one.sub(&back_alpha);

        // (1 - A_f) * A_b: how much of the back layer shows through.
        let back_weight: Quadratic = front_clear.mul(&back_alpha);

        let both_clear: Quadratic = front_clear.mul(&back_clear);
        let both_clear: Cubic = both_clear.mul(&one);
        let composite_alpha = cube_of_one().sub(&both_clear);
        let alpha_miss = self.source_alpha_cubed.sub(&composite_alpha);

        // d(e_c)/dC_f and d(e_c)/dC_b per unit of the current corner's colour.
        let corner = Bilinear::current_corner();
        let front_corner: Quadratic = front_alpha.mul(&corner);
        let front_unit: Cubic = front_corner.mul(&one);
        let front_unit = front_unit.neg();
        let back_unit: Cubic = back_weight.mul(&corner);
        let back_unit = back_unit.neg();

        let front_dual = front_unit.dual();
        let back_dual = back_unit.dual();

        AlphaTrial {
            alpha_front,
            alpha_back,
            front_alpha,
            back_weight,
            alpha_error: alpha_miss.inner(&alpha_miss),
            q_ff: front_unit.dot(&front_dual),
            q_fb: front_unit.dot(&back_dual),
            q_bb: back_unit.dot(&back_dual),
            front_dual,
            back_dual,
        }
    }
}

/// One `(A_f, A_b)` candidate at the current pixel.
#[derive(Clone, Debug)]
pub struct AlphaTrial {
    alpha_front: u8,
    alpha_back: u8,
    front_alpha: Bilinear,
    back_weight: Quadratic,
    alpha_error: i128,
    front_dual: Cubic,
    back_dual: Cubic,
    q_ff: i128,
    q_fb: i128,
    q_bb: i128,
}

impl AlphaTrial {
    /// `(A_f, A_b)` as 4-bit levels.
    pub fn levels(&self) -> (u8, u8) {
        (self.alpha_front, self.alpha_back)
    }

    /// The alpha part of the error, identical for every channel.
    pub fn alpha_error(&self) -> Ise {
        Ise(self.alpha_error)
    }
}

/// Per-pixel state of one colour channel.
#[derive(Clone, Debug)]
pub struct ColorStage {
    source_premul: Cubic,
    front_known: Quadratic,
    back_known: Bilinear,
}

impl ColorStage {
    pub fn new(alpha: &AlphaStage, color: &ChannelTaps) -> Self {
        let one = Bilinear::one();
        let [f0, f1, f2] = color.front;
        let [b0, b1, b2] = color.back;
        let premul: Quadratic = alpha.source_alpha.mul(&Bilinear::from_corners(color.source));
        Self {
            source_premul: premul.mul(&one),
            front_known: Bilinear::from_corners([f0, f1, f2, 0]).mul(&one),
            back_known: Bilinear::from_corners([b0, b1, b2, 0]),
        }
    }

    /// Collapse this channel and an alpha trial into a quadratic in `(C_f, C_b)`.
    pub fn with_trial(&self, trial: &AlphaTrial) -> ChannelTrial {
        let front: Cubic = trial.front_alpha.mul(&self.front_known);
        let back: Cubic = trial.back_weight.mul(&self.back_known);
        let miss = self.source_premul.sub(&front).sub(&back);
        let miss_dual = miss.dual();

        ChannelTrial {
            k0: miss.dot(&miss_dual) + trial.alpha_error,
            kf: 2 * miss.dot(&trial.front_dual),
            kb: 2 * miss.dot(&trial.back_dual),
            kff: trial.q_ff,
            kfb: 2 * trial.q_fb,
            kbb: trial.q_bb,
        }
    }
}

/// Error of one channel as a function of the current pixel's two colour levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelTrial {
    k0: i128,
    kf: i128,
    kb: i128,
    kff: i128,
    kfb: i128,
    kbb: i128,
}

impl ChannelTrial {
    /// Exact error for front colour level `color_front` and back colour level `color_back`.
    pub fn result(&self, color_front: u8, color_back: u8) -> Ise {
        let f = i128::from(level(color_front));
        let b = i128::from(level(color_back));
        Ise(self.k0 + f * (self.kf + f * self.kff + b * self.kfb) + b * (self.kb + b * self.kbb))
    }
}

/// One-shot error of colour channel `channel` for `trial`, without any stage reuse.
pub fn evaluate(nb: &Neighborhood, channel: Component, trial: Trial) -> Ise {
    let alpha = AlphaStage::new(&nb.taps(Component::Alpha));
    let color = ColorStage::new(&alpha, &nb.taps(channel));
    let alpha_trial = alpha.trial(trial.alpha_front, trial.alpha_back);
    color
        .with_trial(&alpha_trial)
        .result(trial.color_front, trial.color_back)
}

#[cfg(test)]
#[path = "../../tests/unit/model/error_model.rs"]
mod tests;
