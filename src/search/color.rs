use crate::config::SearchStrategy;
use crate::foundation::core::MAX_LEVEL;
use crate::model::error_model::{ChannelTrial, Ise};

/// The colour levels picked for one channel under one alpha trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorChoice {
    pub front: u8,
    pub back: u8,
    pub error: Ise,
}

impl SearchStrategy {
    /// Minimize `trial.result` over `(C_f, C_b)`, seeding local search at `(seed, seed)`.
    pub fn search(self, trial: &ChannelTrial, seed: u8) -> ColorChoice {
        match self {
            SearchStrategy::HillClimb => hill_climb(trial, seed),
            SearchStrategy::Exhaustive => exhaustive(trial),
        }
    }
}

/// Every `(C_f, C_b)`, `C_f` outer; the first minimum wins.
pub fn exhaustive(trial: &ChannelTrial) -> ColorChoice {
    let mut best = ColorChoice {
        front: 0,
        back: 0,
        error: trial.result(0, 0),
    };
    for front in 0..=MAX_LEVEL {
        for back in 0..=MAX_LEVEL {
            let error = trial.result(front, back);
            if error < best.error {
                best = ColorChoice { front, back, error };
            }
        }
    }
    best
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    FrontDown,
    FrontUp,
    BackDown,
    BackUp,
}

impl Step {
    const ORDER: [Step; 4] = [Step::FrontDown, Step::FrontUp, Step::BackDown, Step::BackUp];

    fn reverse(self) -> Step {
        match self {
            Step::FrontDown => Step::FrontUp,
            Step::FrontUp => Step::FrontDown,
            Step::BackDown => Step::BackUp,
            Step::BackUp => Step::BackDown,
        }
    }

    fn apply(self, front: u8, back: u8) -> Option<(u8, u8)> {
        match self {
            Step::FrontDown => front.checked_sub(1).map(|f| (f, back)),
            Step::FrontUp => (front < MAX_LEVEL).then_some((front + 1, back)),
            Step::BackDown => back.checked_sub(1).map(|b| (front, b)),
            Step::BackUp => (back < MAX_LEVEL).then_some((front, back + 1)),
        }
    }
}

/// Coordinate descent over single-level moves of `C_f` or `C_b`.
///
/// Each round scores `C_f-1, C_f+1, C_b-1, C_b+1` (skipping moves off the level range and the
/// move that would undo the previous step) and takes the best strict improvement, earliest in
/// that order on ties. Stops at the first point no single move improves.
pub fn hill_climb(trial: &ChannelTrial, seed: u8) -> ColorChoice {
    let seed = seed.min(MAX_LEVEL);
    let mut at = ColorChoice {
        front: seed,
        back: seed,
        error: trial.result(seed, seed),
    };
    let mut undo: Option<Step> = None;
    loop {
        let mut best: Option<(Step, ColorChoice)> = None;
        for step in Step::ORDER {
            if undo == Some(step) {
                continue;
            }
            let Some((front, back)) = step.apply(at.front, at.back) else {
                continue;
            };
            let error = trial.result(front, back);
            let bar = best.map_or(at.error, |(_, c)| c.error);
            if error < bar {
                best = Some((step, ColorChoice { front, back, error }));
            }
        }
        match best {
            Some((step, next)) => {
                at = next;
                undo = Some(step.reverse());
            }
            None => return at,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/color.rs"]
mod tests;
