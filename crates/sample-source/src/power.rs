//! Power-aware sampling modes.
//!
//! Sampling rate dominates sensor power draw on a wearable; these modes
//! trade classification latency for battery life by changing how often
//! the monitor accepts samples from its source.

use std::str::FromStr;

use stridesense_common::error::StrideError;

/// Sampling-rate presets, from battery-saving to power-hungry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// 1 Hz — maximum battery saving.
    Eco,

    /// 5 Hz — good balance.
    Balanced,

    /// 20 Hz — smooth but power hungry.
    Performance,
}

impl PowerMode {
    /// Sampling rate for this mode (Hz).
    pub fn sample_rate_hz(&self) -> u32 {
        match self {
            PowerMode::Eco => 1,
            PowerMode::Balanced => 5,
            PowerMode::Performance => 20,
        }
    }

    /// Sampling period for this mode (seconds).
    pub fn update_interval_secs(&self) -> f64 {
        1.0 / self.sample_rate_hz() as f64
    }

    /// Battery drain relative to eco mode.
    pub fn drain_multiplier(&self) -> f64 {
        match self {
            PowerMode::Eco => 1.0,
            PowerMode::Balanced => 3.0,
            PowerMode::Performance => 10.0,
        }
    }
}

impl FromStr for PowerMode {
    type Err = StrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eco" => Ok(PowerMode::Eco),
            "balanced" => Ok(PowerMode::Balanced),
            "performance" => Ok(PowerMode::Performance),
            other => Err(StrideError::config(format!(
                "unknown power mode '{other}' (expected eco|balanced|performance)"
            ))),
        }
    }
}
