//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where recorded sample streams are stored.
    pub streams_dir: PathBuf,

    /// Default monitoring settings.
    pub monitoring: MonitoringDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default monitoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringDefaults {
    /// Default accelerometer sampling rate (Hz).
    pub sample_rate_hz: u32,

    /// Moving-average window size (samples).
    pub window_size: usize,

    /// Smoothed magnitude below this is stationary (g).
    pub stationary_threshold: f64,

    /// Smoothed magnitude below this (and above stationary) is walking (g).
    pub walking_threshold: f64,

    /// Minimum seconds between committed activity transitions.
    pub cooldown_secs: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "stridesense=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            streams_dir: dirs_default_streams(),
            monitoring: MonitoringDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MonitoringDefaults {
    fn default() -> Self {
        Self {
            sample_rate_hz: 10,
            window_size: 15,
            stationary_threshold: 0.08,
            walking_threshold: 0.35,
            cooldown_secs: 2.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Standard on-disk location of the config file.
    pub fn path() -> PathBuf {
        config_file_path()
    }

    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("stridesense").join("config.json")
}

/// Default recorded-streams directory.
fn dirs_default_streams() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("stridesense").join("streams")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring_defaults_are_valid() {
        let defaults = MonitoringDefaults::default();
        assert!(defaults.stationary_threshold < defaults.walking_threshold);
        assert!(defaults.window_size >= 1);
        assert!(defaults.cooldown_secs >= 0.0);
        assert_eq!(defaults.sample_rate_hz, 10);
    }

    #[test]
    fn test_save_then_load_restores_values() {
        let dir = std::env::temp_dir().join("stridesense-config-test");
        std::env::set_var("XDG_CONFIG_HOME", &dir);

        let mut config = AppConfig::default();
        config.monitoring.sample_rate_hz = 20;
        config.monitoring.cooldown_secs = 1.5;
        config.save().unwrap();
        assert!(AppConfig::path().exists());

        let loaded = AppConfig::load();
        assert_eq!(loaded.monitoring.sample_rate_hz, 20);
        assert!((loaded.monitoring.cooldown_secs - 1.5).abs() < 1e-12);

        std::env::remove_var("XDG_CONFIG_HOME");
        std::fs::remove_dir_all(&dir).ok();
    }
}
