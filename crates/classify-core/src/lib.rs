//! StrideSense Classification Core
//!
//! Turns a serial stream of 3-axis acceleration samples into discrete
//! activity labels:
//! - **Smoothing:** Bounded moving average over recent magnitudes
//! - **Classification:** Threshold state machine with transition cooldown
//! - **Confidence:** Boundary-distance score for each committed transition
//! - **Shake detection:** Spike detector over raw magnitudes
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod classifier;
pub mod shake;
pub mod smoothing;

pub use classifier::{ActivityClassifier, ClassificationMode, ClassifierConfig};
pub use shake::ShakeDetector;
pub use smoothing::MovingAverage;
