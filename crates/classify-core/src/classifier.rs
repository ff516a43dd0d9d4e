//! Threshold-based activity classification state machine.
//!
//! # Algorithm
//!
//! 1. **Magnitude:** Euclidean norm of each incoming acceleration sample.
//! 2. **Smoothing:** Bounded moving average over recent magnitudes.
//! 3. **Candidate:** Map the smoothed magnitude to an activity via two
//!    thresholds (stationary / walking / running).
//! 4. **Cooldown:** A candidate differing from the current state commits
//!    only if the cooldown has elapsed since the last committed transition.
//! 5. **Record:** Each committed transition gets a confidence score and is
//!    pushed onto the bounded history, newest first.
//!
//! An external recognizer (e.g., a platform activity service) can supply
//! labels directly instead; the mode flag selects the strategy without
//! touching the smoothing filter or the history.

use stridesense_common::clock::SessionClock;
use stridesense_common::error::{StrideError, StrideResult};
use stridesense_motion_model::{
    AccelSample, ActivityHistory, ActivityKind, ActivityRecord, TimestampNs,
};

use crate::smoothing::MovingAverage;

/// Confidence assigned to externally supplied labels.
pub const EXTERNAL_CONFIDENCE: f64 = 0.9;

/// Which strategy produces the current activity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationMode {
    /// Classify from smoothed magnitude thresholds.
    #[default]
    Threshold,

    /// Accept labels pushed by an external recognizer.
    External,
}

/// Configuration for the activity classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Smoothed magnitude below this is stationary (g).
    pub stationary_threshold: f64,

    /// Smoothed magnitude at or above `stationary_threshold` but below
    /// this is walking; at or above it is running (g).
    pub walking_threshold: f64,

    /// Minimum seconds between committed transitions.
    pub cooldown_secs: f64,

    /// Moving-average window size (samples).
    pub window_size: usize,

    /// Classification strategy.
    pub mode: ClassificationMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stationary_threshold: 0.08,
            walking_threshold: 0.35,
            cooldown_secs: 2.0,
            window_size: 15,
            mode: ClassificationMode::Threshold,
        }
    }
}

impl ClassifierConfig {
    /// Validate threshold ordering and bounds.
    pub fn validate(&self) -> StrideResult<()> {
        if !self.stationary_threshold.is_finite() || !self.walking_threshold.is_finite() {
            return Err(StrideError::config("thresholds must be finite"));
        }
        if self.stationary_threshold <= 0.0 {
            return Err(StrideError::config(format!(
                "stationary threshold must be positive, got {}",
                self.stationary_threshold
            )));
        }
        if self.stationary_threshold >= self.walking_threshold {
            return Err(StrideError::config(format!(
                "stationary threshold {} must be below walking threshold {}",
                self.stationary_threshold, self.walking_threshold
            )));
        }
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(StrideError::config(format!(
                "cooldown must be non-negative, got {}",
                self.cooldown_secs
            )));
        }
        if self.window_size < 1 {
            return Err(StrideError::config("window size must be at least 1"));
        }
        Ok(())
    }

    fn cooldown_ns(&self) -> u64 {
        SessionClock::secs_to_ns(self.cooldown_secs)
    }
}

/// Boundary-distance confidence for a smoothed magnitude.
///
/// Peaks at the midpoint of the walking band and decays toward its edges;
/// grows with distance from the threshold on either outer side. Always
/// clamped to `[0.0, 1.0]`.
pub fn confidence(smoothed: f64, stationary_threshold: f64, walking_threshold: f64) -> f64 {
    let raw = if smoothed < stationary_threshold {
        (stationary_threshold - smoothed) / stationary_threshold + 0.5
    } else if smoothed < walking_threshold {
        let range = walking_threshold - stationary_threshold;
        let position = smoothed - stationary_threshold;
        0.6 + 0.3 * (1.0 - (position - range / 2.0).abs() / (range / 2.0))
    } else {
        0.7 + (smoothed - walking_threshold) * 0.3
    };
    raw.clamp(0.0, 1.0)
}

/// The activity classification state machine.
///
/// Owns its smoothing filter and transition history exclusively; samples
/// must be fed serially (one pipeline pass completes before the next
/// sample enters).
#[derive(Debug)]
pub struct ActivityClassifier {
    config: ClassifierConfig,
    filter: MovingAverage,
    history: ActivityHistory,
    current: ActivityKind,
    external: ActivityKind,
    smoothed: f64,
    last_transition_ns: Option<TimestampNs>,
}

impl ActivityClassifier {
    /// Create a classifier, rejecting invalid configuration.
    pub fn new(config: ClassifierConfig) -> StrideResult<Self> {
        config.validate()?;
        let filter = MovingAverage::new(config.window_size);
        Ok(Self {
            config,
            filter,
            history: ActivityHistory::new(),
            current: ActivityKind::Unknown,
            external: ActivityKind::Unknown,
            smoothed: 0.0,
            last_transition_ns: None,
        })
    }

    /// Create a classifier with default configuration.
    pub fn with_defaults() -> Self {
        let config = ClassifierConfig::default();
        let filter = MovingAverage::new(config.window_size);
        Self {
            config,
            filter,
            history: ActivityHistory::new(),
            current: ActivityKind::Unknown,
            external: ActivityKind::Unknown,
            smoothed: 0.0,
            last_transition_ns: None,
        }
    }

    /// Feed one acceleration sample through the pipeline.
    ///
    /// Updates the smoothed magnitude on every call. In threshold mode,
    /// returns the committed transition record when one commits; the
    /// returned record doubles as the transition notification and is
    /// produced exactly once per commit.
    pub fn ingest(&mut self, sample: &AccelSample) -> Option<ActivityRecord> {
        self.smoothed = self.filter.add(sample.magnitude());

        if self.config.mode != ClassificationMode::Threshold {
            return None;
        }

        let candidate = self.candidate_for(self.smoothed);
        if candidate == self.current {
            return None;
        }
        if !self.cooldown_elapsed(sample.timestamp_ns) {
            return None;
        }

        let score = confidence(
            self.smoothed,
            self.config.stationary_threshold,
            self.config.walking_threshold,
        );
        Some(self.commit(sample.timestamp_ns, candidate, score))
    }

    /// Accept a label from an external recognizer.
    ///
    /// The label is tracked in both modes, but only commits transitions
    /// in external mode. External commits carry a fixed confidence and
    /// bypass the threshold pipeline.
    pub fn ingest_external(
        &mut self,
        timestamp_ns: TimestampNs,
        label: ActivityKind,
    ) -> Option<ActivityRecord> {
        self.external = label;

        if self.config.mode != ClassificationMode::External || label == self.current {
            return None;
        }

        Some(self.commit(timestamp_ns, label, EXTERNAL_CONFIDENCE))
    }

    /// The current committed activity.
    pub fn current_activity(&self) -> ActivityKind {
        self.current
    }

    /// The most recent label reported by the external recognizer.
    pub fn external_activity(&self) -> ActivityKind {
        self.external
    }

    /// Moving average of recent magnitudes, updated every sample.
    pub fn smoothed_magnitude(&self) -> f64 {
        self.smoothed
    }

    /// Committed transition history, newest first.
    pub fn history(&self) -> &ActivityHistory {
        &self.history
    }

    /// Active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Drop all history records.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Return to the initial state: Unknown activity, empty window,
    /// empty history, no transition on record.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.history.clear();
        self.current = ActivityKind::Unknown;
        self.external = ActivityKind::Unknown;
        self.smoothed = 0.0;
        self.last_transition_ns = None;
    }

    fn candidate_for(&self, smoothed: f64) -> ActivityKind {
        if smoothed < self.config.stationary_threshold {
            ActivityKind::Stationary
        } else if smoothed < self.config.walking_threshold {
            ActivityKind::Walking
        } else {
            ActivityKind::Running
        }
    }

    /// The first transition is exempt: cooldown gates spacing between
    /// commits, not time-to-first-commit.
    fn cooldown_elapsed(&self, now_ns: TimestampNs) -> bool {
        match self.last_transition_ns {
            None => true,
            Some(last) => now_ns.saturating_sub(last) >= self.config.cooldown_ns(),
        }
    }

    fn commit(
        &mut self,
        timestamp_ns: TimestampNs,
        activity: ActivityKind,
        confidence: f64,
    ) -> ActivityRecord {
        self.current = activity;
        self.last_transition_ns = Some(timestamp_ns);

        let record = ActivityRecord {
            activity,
            timestamp_ns,
            confidence,
        };
        self.history.record(record);

        tracing::debug!(
            activity = %activity,
            confidence = format_args!("{confidence:.2}"),
            smoothed = format_args!("{:.4}", self.smoothed),
            "Activity transition committed"
        );

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PERIOD_NS: u64 = 100_000_000; // 10 Hz

    fn sample(n: u64, magnitude: f64) -> AccelSample {
        // Put the whole magnitude on one axis for simple test arithmetic.
        AccelSample::new(n * SAMPLE_PERIOD_NS, magnitude, 0.0, 0.0)
    }

    #[test]
    fn test_initial_state_is_unknown() {
        let classifier = ActivityClassifier::with_defaults();
        assert_eq!(classifier.current_activity(), ActivityKind::Unknown);
        assert!(classifier.history().is_empty());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = ClassifierConfig {
            stationary_threshold: 0.5,
            walking_threshold: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            ActivityClassifier::new(config),
            Err(StrideError::Config { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let config = ClassifierConfig {
            walking_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_cooldown_and_zero_window() {
        let negative = ClassifierConfig {
            cooldown_secs: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let zero_window = ClassifierConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(zero_window.validate().is_err());
    }

    #[test]
    fn test_first_transition_commits_without_cooldown_wait() {
        let mut classifier = ActivityClassifier::with_defaults();
        let record = classifier.ingest(&sample(0, 0.02)).unwrap();
        assert_eq!(record.activity, ActivityKind::Stationary);
        assert_eq!(classifier.current_activity(), ActivityKind::Stationary);
    }

    #[test]
    fn test_candidate_boundaries() {
        let config = ClassifierConfig::default();
        let classifier = ActivityClassifier::new(config).unwrap();
        assert_eq!(classifier.candidate_for(0.079), ActivityKind::Stationary);
        assert_eq!(classifier.candidate_for(0.08), ActivityKind::Walking);
        assert_eq!(classifier.candidate_for(0.349), ActivityKind::Walking);
        assert_eq!(classifier.candidate_for(0.35), ActivityKind::Running);
    }

    #[test]
    fn test_cooldown_blocks_rapid_flapping() {
        let mut classifier = ActivityClassifier::with_defaults();

        // Commit an initial transition.
        assert!(classifier.ingest(&sample(0, 0.02)).is_some());

        // Oscillate hard for 2 seconds; the smoothed magnitude crosses
        // thresholds but nothing may commit inside the cooldown.
        let mut commits = 0;
        for n in 1..20 {
            let magnitude = if n % 2 == 0 { 0.05 } else { 3.0 };
            if classifier.ingest(&sample(n, magnitude)).is_some() {
                commits += 1;
            }
        }
        assert_eq!(commits, 0);

        // After the cooldown a differing candidate commits once.
        let record = classifier.ingest(&sample(20, 3.0));
        assert!(record.is_some());
    }

    #[test]
    fn test_cooldown_window_scales_with_config() {
        let config = ClassifierConfig {
            cooldown_secs: 0.5,
            window_size: 1,
            ..Default::default()
        };
        let mut classifier = ActivityClassifier::new(config).unwrap();

        assert!(classifier.ingest(&sample(0, 0.02)).is_some());
        // 400ms later: still inside the half-second cooldown.
        assert!(classifier.ingest(&sample(4, 3.0)).is_none());
        // 500ms after the first commit: eligible again.
        assert!(classifier.ingest(&sample(5, 3.0)).is_some());
    }

    #[test]
    fn test_same_candidate_never_commits() {
        let mut classifier = ActivityClassifier::with_defaults();
        assert!(classifier.ingest(&sample(0, 0.02)).is_some());
        for n in 1..100 {
            assert!(classifier.ingest(&sample(n, 0.02)).is_none());
        }
        assert_eq!(classifier.history().len(), 1);
    }

    #[test]
    fn test_external_mode_commits_pushed_labels() {
        let config = ClassifierConfig {
            mode: ClassificationMode::External,
            ..Default::default()
        };
        let mut classifier = ActivityClassifier::new(config).unwrap();

        // Threshold pipeline stays quiet in external mode.
        assert!(classifier.ingest(&sample(0, 3.0)).is_none());

        let record = classifier
            .ingest_external(100_000_000, ActivityKind::Walking)
            .unwrap();
        assert_eq!(record.activity, ActivityKind::Walking);
        assert!((record.confidence - EXTERNAL_CONFIDENCE).abs() < 1e-12);
        assert_eq!(classifier.current_activity(), ActivityKind::Walking);

        // Unchanged label does not re-commit.
        assert!(classifier
            .ingest_external(200_000_000, ActivityKind::Walking)
            .is_none());
    }

    #[test]
    fn test_threshold_mode_tracks_but_ignores_external_labels() {
        let mut classifier = ActivityClassifier::with_defaults();
        assert!(classifier
            .ingest_external(0, ActivityKind::Running)
            .is_none());
        assert_eq!(classifier.external_activity(), ActivityKind::Running);
        assert_eq!(classifier.current_activity(), ActivityKind::Unknown);
    }

    #[test]
    fn test_smoothed_magnitude_updates_every_sample() {
        let mut classifier = ActivityClassifier::with_defaults();
        classifier.ingest(&sample(0, 0.3));
        assert!((classifier.smoothed_magnitude() - 0.3).abs() < 1e-12);
        classifier.ingest(&sample(1, 0.1));
        assert!((classifier.smoothed_magnitude() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut classifier = ActivityClassifier::with_defaults();
        classifier.ingest(&sample(0, 0.5));
        classifier.reset();
        assert_eq!(classifier.current_activity(), ActivityKind::Unknown);
        assert_eq!(classifier.smoothed_magnitude(), 0.0);
        assert!(classifier.history().is_empty());

        // Post-reset, the first differing candidate commits again.
        assert!(classifier.ingest(&sample(1, 0.02)).is_some());
    }

    #[test]
    fn test_confidence_stationary_band() {
        // Deep below the stationary threshold: strong confidence.
        let c = confidence(0.0, 0.08, 0.35);
        assert!((c - 1.0).abs() < 1e-12);
        // Just under the threshold: barely above the 0.5 floor.
        let c = confidence(0.079, 0.08, 0.35);
        assert!(c >= 0.5 && c < 0.52);
    }

    #[test]
    fn test_confidence_peaks_at_walking_midpoint() {
        let mid = (0.08 + 0.35) / 2.0;
        let at_mid = confidence(mid, 0.08, 0.35);
        assert!((at_mid - 0.9).abs() < 1e-9);
        assert!(confidence(0.1, 0.08, 0.35) < at_mid);
        assert!(confidence(0.33, 0.08, 0.35) < at_mid);
    }

    #[test]
    fn test_confidence_running_band_saturates() {
        assert!((confidence(0.35, 0.08, 0.35) - 0.7).abs() < 1e-12);
        assert_eq!(confidence(5.0, 0.08, 0.35), 1.0);
    }
}
