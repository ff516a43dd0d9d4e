//! Bounded moving-average smoothing for magnitude streams.
//!
//! Raw accelerometer magnitude is noisy; a short sliding window removes
//! spikes while staying responsive (~1.5s lag at 10 Hz with the default
//! window of 15 samples).

use std::collections::VecDeque;

/// Bounded FIFO moving average.
///
/// Before the window fills, the mean is taken over however many samples
/// are held so far rather than waiting for a full window. Output starts
/// on the first sample at the cost of early-sample accuracy.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    samples: VecDeque<f64>,
    window_size: usize,
}

impl MovingAverage {
    /// Create a moving average over the given window size.
    ///
    /// A window size of 0 is clamped to 1.
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            samples: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Push a value and return the mean of the currently held window.
    pub fn add(&mut self, value: f64) -> f64 {
        self.samples.push_back(value);
        if self.samples.len() > self.window_size {
            self.samples.pop_front();
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Clear the window.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Number of samples currently held (at most the window size).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured window size.
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_window_divides_by_count() {
        let mut avg = MovingAverage::new(4);
        assert!((avg.add(1.0) - 1.0).abs() < 1e-12);
        assert!((avg.add(3.0) - 2.0).abs() < 1e-12);
        assert!((avg.add(5.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_window_evicts_oldest() {
        let mut avg = MovingAverage::new(3);
        avg.add(1.0);
        avg.add(2.0);
        avg.add(3.0);
        // Window is [2, 3, 4] after this push.
        assert!((avg.add(4.0) - 3.0).abs() < 1e-12);
        assert_eq!(avg.len(), 3);
    }

    #[test]
    fn test_reset_then_replay_is_identical() {
        let sequence = [0.1, 0.9, 0.3, 0.5, 0.2, 0.8];
        let mut avg = MovingAverage::new(4);
        let first: Vec<f64> = sequence.iter().map(|&v| avg.add(v)).collect();
        avg.reset();
        let second: Vec<f64> = sequence.iter().map(|&v| avg.add(v)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_window_clamps_to_one() {
        let mut avg = MovingAverage::new(0);
        assert_eq!(avg.window_size(), 1);
        avg.add(2.0);
        assert!((avg.add(6.0) - 6.0).abs() < 1e-12);
        assert_eq!(avg.len(), 1);
    }

    #[test]
    fn test_constant_input_is_fixed_point() {
        let mut avg = MovingAverage::new(15);
        for _ in 0..40 {
            assert!((avg.add(0.05) - 0.05).abs() < 1e-12);
        }
    }
}
