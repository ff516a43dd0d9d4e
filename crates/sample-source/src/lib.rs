//! StrideSense Sample Source
//!
//! Delivers timestamped 3-axis acceleration samples to the classification
//! pipeline. Uses a pluggable source architecture:
//!
//! - **Iio:** Linux industrial-I/O sysfs accelerometer (live hardware)
//! - **Simulated:** Deterministic synthetic motion for demos and tests
//! - **Replay:** Pre-recorded sample vectors (JSONL streams)
//!
//! The monitor drives one source serially: a sample's full pipeline pass
//! (magnitude, smoothing, classification) completes before the next
//! sample is polled, so classifier and filter state need no further
//! synchronization.

pub mod power;
pub mod sources;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use stridesense_classify_core::{ActivityClassifier, ShakeDetector};
use stridesense_common::clock::RateController;
use stridesense_common::error::StrideResult;
use stridesense_motion_model::{AccelSample, ActivityKind, ActivityRecord};

/// Trait for acceleration sample sources.
pub trait SampleSource: Send {
    /// Poll for the next sample. Returns `None` if no sample is available.
    fn poll(&mut self) -> StrideResult<Option<AccelSample>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if the source is available on this system.
    fn is_available(&self) -> bool;
}

/// Counters and final state reported when a monitoring session stops.
#[derive(Debug, Clone)]
pub struct MonitorSummary {
    /// Samples fed through the pipeline (after rate gating).
    pub samples_processed: u64,

    /// Transitions committed during the session.
    pub transitions_committed: u64,

    /// Shakes counted during the session.
    pub shakes_detected: u64,

    /// Activity at session end (frozen, not reset).
    pub last_activity: ActivityKind,

    /// Smoothed magnitude at session end.
    pub last_smoothed_magnitude: f64,
}

/// The motion monitor that coordinates a source with the classifier.
pub struct MotionMonitor {
    source: Box<dyn SampleSource>,
    classifier: ActivityClassifier,
    shake: ShakeDetector,
    rate: RateController,
    stop_flag: Arc<AtomicBool>,
    transitions_tx: Option<mpsc::UnboundedSender<ActivityRecord>>,
    samples_processed: u64,
    transitions_committed: u64,
}

impl MotionMonitor {
    /// Create a monitor gating the source down to the given sampling rate.
    pub fn new(source: Box<dyn SampleSource>, classifier: ActivityClassifier, rate_hz: u32) -> Self {
        Self {
            source,
            classifier,
            shake: ShakeDetector::default(),
            rate: RateController::new(rate_hz),
            stop_flag: Arc::new(AtomicBool::new(false)),
            transitions_tx: None,
            samples_processed: 0,
            transitions_committed: 0,
        }
    }

    /// Subscribe to committed transitions. Each commit is delivered
    /// exactly once; consumers use it to drive haptic/visual feedback.
    pub fn transition_stream(&mut self) -> mpsc::UnboundedReceiver<ActivityRecord> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.transitions_tx = Some(tx);
        rx
    }

    /// Run the monitoring loop until the stop flag is set.
    ///
    /// Samples are processed strictly one at a time; stopping freezes the
    /// classifier on its last state rather than resetting it.
    pub async fn run(&mut self) -> StrideResult<MonitorSummary> {
        tracing::info!(source = %self.source.name(), "Motion monitor started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.source.poll() {
                Ok(Some(sample)) => {
                    if !self.rate.should_tick(sample.timestamp_ns) {
                        continue;
                    }
                    self.process_sample(&sample);
                }
                Ok(None) => {
                    // No sample available, yield briefly
                    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Sample source error");
                }
            }
        }

        let summary = self.summary();
        tracing::info!(
            samples = summary.samples_processed,
            transitions = summary.transitions_committed,
            shakes = summary.shakes_detected,
            activity = %summary.last_activity,
            "Motion monitor stopped"
        );
        Ok(summary)
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Number of samples processed so far.
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Read access to the classifier (current activity, history).
    pub fn classifier(&self) -> &ActivityClassifier {
        &self.classifier
    }

    /// Counters and final state for the session so far.
    pub fn summary(&self) -> MonitorSummary {
        MonitorSummary {
            samples_processed: self.samples_processed,
            transitions_committed: self.transitions_committed,
            shakes_detected: self.shake.count(),
            last_activity: self.classifier.current_activity(),
            last_smoothed_magnitude: self.classifier.smoothed_magnitude(),
        }
    }

    fn process_sample(&mut self, sample: &AccelSample) {
        // Shake detection runs on the raw magnitude; the smoothing window
        // would flatten the spike before the classifier ever saw it.
        if self.shake.detect(sample.timestamp_ns, sample.magnitude()) {
            tracing::info!(count = self.shake.count(), "Shake detected");
        }

        if let Some(record) = self.classifier.ingest(sample) {
            self.transitions_committed += 1;
            let receiver_gone = self
                .transitions_tx
                .as_ref()
                .is_some_and(|tx| tx.send(record).is_err());
            if receiver_gone {
                // Receiver dropped; stop notifying.
                self.transitions_tx = None;
            }
        }

        self.samples_processed += 1;
    }
}
