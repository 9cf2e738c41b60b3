use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::MAX_LEVEL;
use crate::foundation::error::{SplitError, SplitResult};

/// How each channel picks `(C_f, C_b)` for a fixed alpha trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Coordinate descent from the source's high nibble; a local optimum.
    #[default]
    HillClimb,
    /// All 256 colour pairs; the global optimum per channel and alpha trial.
    Exhaustive,
}

/// Which `(A_f, A_b)` pairs the optimizer scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaOrder {
    /// All 256 pairs.
    #[default]
    Full,
    /// Only pairs with `A_b >= A_f` (136 pairs).
    BackAtLeastFront,
}

impl AlphaOrder {
    /// Candidate `(A_f, A_b)` pairs in scoring order: `A_b` outer, `A_f` inner, both ascending.
    pub fn pairs(self) -> impl Iterator<Item = (u8, u8)> {
        (0..=MAX_LEVEL).flat_map(move |back| {
            (0..=MAX_LEVEL)
                .filter(move |&front| match self {
                    AlphaOrder::Full => true,
                    AlphaOrder::BackAtLeastFront => back >= front,
                })
                .map(move |front| (front, back))
        })
    }
}

/// Options controlling a split run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOpts {
    /// Per-channel colour search.
    pub strategy: SearchStrategy,
    /// Alpha pairs considered per pixel.
    pub alpha_order: AlphaOrder,
    /// Skip alpha trials whose composite alpha at the current pixel is further than
    /// `tolerance / 15` from the source alpha. `None` scores every pair.
    pub alpha_tolerance: Option<u8>,
    /// Solve anti-diagonals concurrently on a rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for SplitOpts {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::HillClimb,
            alpha_order: AlphaOrder::Full,
            alpha_tolerance: None,
            parallel: false,
            threads: None,
        }
    }
}

impl SplitOpts {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> SplitResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        let opts: SplitOpts = serde_json::from_str(&text)
            .map_err(|e| SplitError::validation(format!("parse options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> SplitResult<()> {
        if let Some(t) = self.alpha_tolerance
            && !(1..=MAX_LEVEL).contains(&t)
        {
            return Err(SplitError::validation(format!(
                "alpha_tolerance must be in 1..={MAX_LEVEL}, got {t}"
            )));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(SplitError::validation(
                "split threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
