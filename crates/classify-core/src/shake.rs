//! Shake detection over raw acceleration magnitudes.
//!
//! Runs beside the activity pipeline on unsmoothed magnitudes: a shake is
//! a short spike the moving average would flatten out.

use stridesense_motion_model::TimestampNs;

/// Spike detector with a per-event cooldown.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    /// Magnitude above this counts as a shake (g).
    threshold: f64,

    /// Minimum seconds between counted shakes.
    cooldown_secs: f64,

    count: u64,
    last_shake_ns: Option<TimestampNs>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(2.0, 0.5)
    }
}

impl ShakeDetector {
    /// Create a detector with the given threshold (g) and cooldown (seconds).
    pub fn new(threshold: f64, cooldown_secs: f64) -> Self {
        Self {
            threshold,
            cooldown_secs,
            count: 0,
            last_shake_ns: None,
        }
    }

    /// Feed one raw magnitude; returns true when a shake is counted.
    pub fn detect(&mut self, timestamp_ns: TimestampNs, magnitude: f64) -> bool {
        if magnitude <= self.threshold {
            return false;
        }

        let cooldown_ns = (self.cooldown_secs * 1_000_000_000.0) as u64;
        let ready = match self.last_shake_ns {
            None => true,
            Some(last) => timestamp_ns.saturating_sub(last) >= cooldown_ns,
        };
        if !ready {
            return false;
        }

        self.count += 1;
        self.last_shake_ns = Some(timestamp_ns);
        true
    }

    /// Shakes counted since creation or the last reset.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Zero the counter and forget the last shake time.
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_shake_ns = None;
    }
}
