//! End-to-end classification scenarios over synthetic sample streams.

use proptest::prelude::*;

use stridesense_classify_core::classifier::{confidence, ActivityClassifier, ClassifierConfig};
use stridesense_classify_core::smoothing::MovingAverage;
use stridesense_motion_model::{AccelSample, ActivityKind};

const SAMPLE_PERIOD_NS: u64 = 100_000_000; // 10 Hz

fn sample_at(n: u64, magnitude: f64) -> AccelSample {
    AccelSample::new(n * SAMPLE_PERIOD_NS, magnitude, 0.0, 0.0)
}

#[test]
fn quiet_stream_settles_on_stationary_with_strong_confidence() {
    let mut classifier = ActivityClassifier::with_defaults();

    let mut committed = None;
    for n in 0..15 {
        if let Some(record) = classifier.ingest(&sample_at(n, 0.05)) {
            committed = Some(record);
        }
    }

    assert_eq!(classifier.current_activity(), ActivityKind::Stationary);
    let record = committed.expect("quiet stream should commit a transition");
    assert_eq!(record.activity, ActivityKind::Stationary);
    assert!(record.confidence >= 0.5);
}

#[test]
fn running_commits_only_after_cooldown_from_previous_transition() {
    let mut classifier = ActivityClassifier::with_defaults();

    // Settle on Stationary at t=0.
    let first = classifier.ingest(&sample_at(0, 0.05));
    assert_eq!(first.map(|r| r.activity), Some(ActivityKind::Stationary));

    // Hard running-level motion from t=0.1s onwards. The smoothed
    // magnitude crosses the walking threshold within a few samples, but
    // nothing may commit until 2.0s after the Stationary transition.
    let mut commit_ns = None;
    for n in 1..=25 {
        if let Some(record) = classifier.ingest(&sample_at(n, 0.5)) {
            assert!(commit_ns.is_none(), "only one transition should commit");
            assert_eq!(record.activity, ActivityKind::Running);
            commit_ns = Some(record.timestamp_ns);
        }
    }

    let commit_ns = commit_ns.expect("running should eventually commit");
    assert!(commit_ns >= 2_000_000_000);
    assert_eq!(commit_ns, 2_000_000_000); // first eligible sample
}

#[test]
fn rapid_oscillation_commits_at_most_once_within_cooldown() {
    let mut classifier = ActivityClassifier::with_defaults();

    // Alternate between quiet and violent every sample for 2 seconds.
    let mut commits = 0;
    for n in 0..20 {
        let magnitude = if n % 2 == 0 { 0.05 } else { 0.5 };
        if classifier.ingest(&sample_at(n, magnitude)).is_some() {
            commits += 1;
        }
    }

    assert!(commits <= 1, "cooldown must suppress flapping, got {commits}");
}

#[test]
fn history_keeps_twenty_newest_of_twenty_five_transitions() {
    // Window of 1 makes smoothing the identity, so each cooldown-spaced
    // sample flips the candidate and commits.
    let config = ClassifierConfig {
        window_size: 1,
        ..Default::default()
    };
    let mut classifier = ActivityClassifier::new(config).unwrap();

    for i in 0..25u64 {
        let magnitude = if i % 2 == 0 { 0.02 } else { 3.0 };
        let t = i * 2_000_000_000; // exactly cooldown-spaced
        let record = classifier.ingest(&AccelSample::new(t, magnitude, 0.0, 0.0));
        assert!(record.is_some(), "transition {i} should commit");
    }

    let history = classifier.history();
    assert_eq!(history.len(), 20);
    // Newest first: the 25th transition sits at index 0.
    assert_eq!(history.latest().unwrap().timestamp_ns, 24 * 2_000_000_000);
    // Transitions 1-5 are evicted; #6 is the oldest survivor.
    assert_eq!(history.get(19).unwrap().timestamp_ns, 5 * 2_000_000_000);
    assert!(history.iter().all(|r| r.timestamp_ns >= 5 * 2_000_000_000));
}

#[test]
fn reset_then_replay_reproduces_smoothed_values() {
    let magnitudes = [0.05, 0.3, 0.7, 0.1, 0.0, 1.2, 0.4, 0.05];
    let mut classifier = ActivityClassifier::with_defaults();

    let run = |classifier: &mut ActivityClassifier| -> Vec<f64> {
        magnitudes
            .iter()
            .enumerate()
            .map(|(n, &m)| {
                classifier.ingest(&sample_at(n as u64, m));
                classifier.smoothed_magnitude()
            })
            .collect()
    };

    let first = run(&mut classifier);
    classifier.reset();
    let second = run(&mut classifier);
    assert_eq!(first, second);
}

proptest! {
    /// The filter output is always the arithmetic mean of at most the
    /// last N values seen so far.
    #[test]
    fn prop_moving_average_matches_reference(
        values in proptest::collection::vec(0.0f64..5.0, 1..120),
        window in 1usize..30,
    ) {
        let mut avg = MovingAverage::new(window);
        for (i, &v) in values.iter().enumerate() {
            let out = avg.add(v);
            let start = (i + 1).saturating_sub(window);
            let tail = &values[start..=i];
            let expected: f64 = tail.iter().sum::<f64>() / tail.len() as f64;
            prop_assert!((out - expected).abs() < 1e-9);
        }
    }

    /// Confidence is in [0, 1] for any magnitude and any valid thresholds.
    #[test]
    fn prop_confidence_in_unit_interval(
        magnitude in 0.0f64..10.0,
        stationary in 0.01f64..0.5,
        gap in 0.01f64..2.0,
    ) {
        let c = confidence(magnitude, stationary, stationary + gap);
        prop_assert!((0.0..=1.0).contains(&c));
    }

    /// Committed transitions are never closer together than the cooldown.
    #[test]
    fn prop_commits_respect_cooldown_spacing(
        magnitudes in proptest::collection::vec(0.0f64..4.0, 1..300),
    ) {
        let mut classifier = ActivityClassifier::with_defaults();
        let cooldown_ns = 2_000_000_000u64;

        let mut last_commit: Option<u64> = None;
        for (n, &m) in magnitudes.iter().enumerate() {
            if let Some(record) = classifier.ingest(&sample_at(n as u64, m)) {
                if let Some(prev) = last_commit {
                    prop_assert!(record.timestamp_ns - prev >= cooldown_ns);
                }
                last_commit = Some(record.timestamp_ns);
            }
        }
    }

    /// History never exceeds its capacity regardless of input.
    #[test]
    fn prop_history_is_bounded(
        magnitudes in proptest::collection::vec(0.0f64..4.0, 1..500),
    ) {
        let config = ClassifierConfig { window_size: 1, ..Default::default() };
        let mut classifier = ActivityClassifier::new(config).unwrap();
        for (n, &m) in magnitudes.iter().enumerate() {
            classifier.ingest(&sample_at(n as u64 * 25, m)); // 2.5s apart
        }
        prop_assert!(classifier.history().len() <= 20);
    }
}
