use super::*;

#[test]
fn full_order_scans_back_outer_front_inner() {
    let pairs: Vec<(u8, u8)> = AlphaOrder::Full.pairs().collect();
    assert_eq!(pairs.len(), 256);
    assert_eq!(&pairs[..3], &[(0, 0), (1, 0), (2, 0)]);
    assert_eq!(pairs[15], (15, 0));
    assert_eq!(pairs[16], (0, 1));
    assert_eq!(pairs[255], (15, 15));
}

#[test]
fn restricted_order_keeps_back_at_least_front() {
    let pairs: Vec<(u8, u8)> = AlphaOrder::BackAtLeastFront.pairs().collect();
    assert_eq!(pairs.len(), 136);
    assert!(pairs.iter().all(|&(f, b)| b >= f));
    assert_eq!(&pairs[..4], &[(0, 0), (0, 1), (1, 1), (0, 2)]);
}

#[test]
fn defaults_validate() {
    let opts = SplitOpts::default();
    assert_eq!(opts.strategy, SearchStrategy::HillClimb);
    assert_eq!(opts.alpha_order, AlphaOrder::Full);
    opts.validate().unwrap();
}

#[test]
fn invalid_tolerance_and_threads_are_rejected() {
    let opts = SplitOpts {
        alpha_tolerance: Some(0),
        ..SplitOpts::default()
    };
    assert!(matches!(opts.validate(), Err(SplitError::Validation(_))));

    let opts = SplitOpts {
        alpha_tolerance: Some(16),
        ..SplitOpts::default()
    };
    assert!(opts.validate().is_err());

    let opts = SplitOpts {
        threads: Some(0),
        ..SplitOpts::default()
    };
    assert!(opts.validate().is_err());
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let opts: SplitOpts =
        serde_json::from_str(r#"{ "strategy": "exhaustive", "alpha_tolerance": 2 }"#).unwrap();
    assert_eq!(opts.strategy, SearchStrategy::Exhaustive);
    assert_eq!(opts.alpha_tolerance, Some(2));
    assert_eq!(opts.alpha_order, AlphaOrder::Full);
    assert!(!opts.parallel);

    assert!(serde_json::from_str::<SplitOpts>(r#"{ "bogus": 1 }"#).is_err());
}

#[test]
fn from_path_reads_and_validates() {
    let dir = std::path::PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "alpha_order": "back_at_least_front", "parallel": true }"#).unwrap();
    let opts = SplitOpts::from_path(&good).unwrap();
    assert_eq!(opts.alpha_order, AlphaOrder::BackAtLeastFront);
    assert!(opts.parallel);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "threads": 0 }"#).unwrap();
    assert!(SplitOpts::from_path(&bad).is_err());

    assert!(SplitOpts::from_path(&dir.join("missing.json")).is_err());
}
