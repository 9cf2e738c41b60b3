use super::*;
use crate::foundation::core::Rgba8;
use crate::model::error_model::evaluate;
use crate::model::taps::Trial;

fn opts(strategy: SearchStrategy) -> SplitOpts {
    SplitOpts {
        strategy,
        ..SplitOpts::default()
    }
}

fn gray_corner() -> Neighborhood {
    Neighborhood {
        source: [
            Rgba8::transparent(),
            Rgba8::transparent(),
            Rgba8::transparent(),
            Rgba8::new(128, 128, 128, 255),
        ],
        ..Neighborhood::default()
    }
}

fn rgba4(r: u8, g: u8, b: u8, a: u8) -> Rgba4 {
    Rgba4::new(r, g, b, a).unwrap()
}

fn mixed() -> Neighborhood {
    Neighborhood {
        source: [
            Rgba8::new(12, 200, 90, 255),
            Rgba8::new(240, 30, 60, 128),
            Rgba8::new(0, 0, 255, 64),
            Rgba8::new(100, 150, 200, 190),
        ],
        front: [rgba4(1, 12, 5, 15), rgba4(14, 2, 4, 8), rgba4(0, 0, 15, 4)],
        back: [rgba4(0, 0, 0, 0), rgba4(15, 1, 3, 2), rgba4(2, 2, 14, 1)],
    }
}

#[test]
fn opaque_gray_prefers_opaque_front_at_nearest_level() {
    let sol = Optimizer::new(&SplitOpts::default())
        .unwrap()
        .solve(&gray_corner())
        .unwrap();
    assert_eq!(sol.front, rgba4(8, 8, 8, 15));
    // Back is masked; hill climbing leaves its colour at the seed.
    assert_eq!(sol.back, rgba4(8, 8, 8, 0));
    assert_eq!(sol.error.raw(), 824_865_262_663_680_000);
    assert_eq!(sol.alpha_trials, 256);
}

#[test]
fn exhaustive_breaks_masked_back_ties_at_level_zero() {
    let sol = Optimizer::new(&opts(SearchStrategy::Exhaustive))
        .unwrap()
        .solve(&gray_corner())
        .unwrap();
    assert_eq!(sol.front, rgba4(8, 8, 8, 15));
    assert_eq!(sol.back, rgba4(0, 0, 0, 0));
}

#[test]
fn restricted_alpha_order_moves_opacity_to_back() {
    let o = SplitOpts {
        alpha_order: AlphaOrder::BackAtLeastFront,
        ..SplitOpts::default()
    };
    let sol = Optimizer::new(&o).unwrap().solve(&gray_corner()).unwrap();
    assert_eq!(sol.front, rgba4(8, 8, 8, 0));
    assert_eq!(sol.back, rgba4(8, 8, 8, 15));
    assert_eq!(sol.alpha_trials, 136);
}

#[test]
fn transparent_source_picks_first_alpha_pair() {
    let nb = Neighborhood {
        source: [Rgba8::new(90, 30, 250, 0); 4],
        ..Neighborhood::default()
    };
    for strategy in [SearchStrategy::HillClimb, SearchStrategy::Exhaustive] {
        let sol = Optimizer::new(&opts(strategy)).unwrap().solve(&nb).unwrap();
        assert_eq!((sol.front.a, sol.back.a), (0, 0));
        assert_eq!(sol.error, Ise::ZERO);
    }
}

#[test]
fn tolerance_prunes_alpha_trials_without_losing_exact_match() {
    let o = SplitOpts {
        alpha_tolerance: Some(1),
        ..SplitOpts::default()
    };
    let sol = Optimizer::new(&o).unwrap().solve(&gray_corner()).unwrap();
    assert_eq!(sol.front, rgba4(8, 8, 8, 15));
    assert_eq!(sol.alpha_trials, 76);
}

#[test]
fn admits_matches_composite_alpha_window() {
    let o = Optimizer::new(&SplitOpts {
        alpha_tolerance: Some(1),
        ..SplitOpts::default()
    })
    .unwrap();
    assert!(o.admits(255, 15, 0));
    assert!(o.admits(255, 0, 15));
    assert!(o.admits(0, 0, 0));
    assert!(o.admits(0, 1, 0));
    assert!(!o.admits(0, 2, 0));
    assert!(!o.admits(255, 0, 0));

    let open = Optimizer::new(&SplitOpts::default()).unwrap();
    assert!(open.admits(255, 0, 0));
}

#[test]
fn solution_error_matches_one_shot_evaluation() {
    let nb = mixed();
    for strategy in [SearchStrategy::HillClimb, SearchStrategy::Exhaustive] {
        let sol = Optimizer::new(&opts(strategy)).unwrap().solve(&nb).unwrap();
        let recomputed: Ise = Component::COLORS
            .iter()
            .map(|&c| {
                evaluate(
                    &nb,
                    c,
                    Trial {
                        alpha_front: sol.front.a,
                        alpha_back: sol.back.a,
                        color_front: sol.front.component(c),
                        color_back: sol.back.component(c),
                    },
                )
            })
            .sum();
        assert_eq!(sol.error, recomputed);
        for px in [sol.front, sol.back] {
            assert!(px.to_rgba8().to_array().iter().all(|v| v % 17 == 0));
        }
    }
}

#[test]
fn exhaustive_is_optimal_per_channel_for_chosen_alpha() {
    let nb = mixed();
    let sol = Optimizer::new(&opts(SearchStrategy::Exhaustive))
        .unwrap()
        .solve(&nb)
        .unwrap();
    for c in Component::COLORS {
        let chosen = Trial {
            alpha_front: sol.front.a,
            alpha_back: sol.back.a,
            color_front: sol.front.component(c),
            color_back: sol.back.component(c),
        };
        let chosen_err = evaluate(&nb, c, chosen);
        for cf in 0..16 {
            for cb in 0..16 {
                let other = Trial {
                    color_front: cf,
                    color_back: cb,
                    ..chosen
                };
                assert!(evaluate(&nb, c, other) >= chosen_err);
            }
        }
    }
}

#[test]
fn exhaustive_total_never_exceeds_hill_climb_total() {
    let nb = mixed();
    let hill = Optimizer::new(&opts(SearchStrategy::HillClimb))
        .unwrap()
        .solve(&nb)
        .unwrap();
    let full = Optimizer::new(&opts(SearchStrategy::Exhaustive))
        .unwrap()
        .solve(&nb)
        .unwrap();
    assert!(full.error <= hill.error);
}

#[test]
fn invalid_opts_are_rejected() {
    let o = SplitOpts {
        alpha_tolerance: Some(0),
        ..SplitOpts::default()
    };
    assert!(Optimizer::new(&o).is_err());
}
