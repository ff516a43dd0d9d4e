//! Acceleration sample types for the StrideSense sample stream.
//!
//! Samples are recorded in append-only JSONL format for crash safety.
//! All axis values are in units of g; handheld motion typically stays
//! within `[-4.0, 4.0]` but the format does not bound them.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since monitoring start.
pub type TimestampNs = u64;

/// A single timestamped 3-axis acceleration reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// Monotonic nanoseconds since monitoring start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Acceleration along the X axis (g).
    pub x: f64,

    /// Acceleration along the Y axis (g).
    pub y: f64,

    /// Acceleration along the Z axis (g).
    pub z: f64,
}

impl AccelSample {
    /// Create a sample from raw axis values.
    pub fn new(timestamp_ns: TimestampNs, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp_ns,
            x,
            y,
            z,
        }
    }

    /// Euclidean norm of the acceleration vector.
    ///
    /// Total over finite inputs: negative components and the all-zero
    /// vector are fine (the latter yields 0).
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Timestamp as fractional seconds since monitoring start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

/// Stream of samples with recording metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at monitoring start (ISO 8601).
    pub epoch_wall: String,

    /// Nominal sampling rate for acceleration samples (Hz).
    pub sample_rate_hz: u32,

    /// Name of the source that produced the stream (e.g., "iio", "simulated").
    pub source: String,
}

/// Parse samples from JSONL content (one JSON object per line).
pub fn parse_samples(jsonl: &str) -> Result<Vec<AccelSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[AccelSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}
