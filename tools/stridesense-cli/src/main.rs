//! StrideSense CLI — Command-line interface for activity monitoring.
//!
//! Usage:
//!   stridesense monitor [OPTIONS]     Run a live monitoring session
//!   stridesense replay <PATH>         Classify a recorded sample stream
//!   stridesense simulate [OPTIONS]    Generate a synthetic sample stream
//!   stridesense config [--init]       Show or create the config file
//!   stridesense check                 Check system capabilities

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use stridesense_common::config::{AppConfig, LoggingConfig, MonitoringDefaults};

mod commands;

#[derive(Parser)]
#[command(
    name = "stridesense",
    about = "Real-time activity classification from accelerometer streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Classifier tuning flags shared by `monitor` and `replay`.
///
/// Omitted flags fall back to the loaded configuration, so the CLI and
/// the config file cannot drift apart.
#[derive(Debug, Clone, Copy, Args)]
struct ClassifierArgs {
    /// Stationary threshold on smoothed magnitude (g)
    #[arg(long)]
    stationary: Option<f64>,

    /// Walking threshold on smoothed magnitude (g)
    #[arg(long)]
    walking: Option<f64>,

    /// Minimum seconds between committed transitions
    #[arg(long)]
    cooldown: Option<f64>,

    /// Moving-average window size (samples)
    #[arg(long)]
    window: Option<usize>,
}

impl ClassifierArgs {
    fn resolve(self, defaults: &MonitoringDefaults) -> (f64, f64, f64, usize) {
        (
            self.stationary.unwrap_or(defaults.stationary_threshold),
            self.walking.unwrap_or(defaults.walking_threshold),
            self.cooldown.unwrap_or(defaults.cooldown_secs),
            self.window.unwrap_or(defaults.window_size),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a monitoring session against a live or simulated source
    Monitor {
        /// Sample source: auto|simulated
        #[arg(long, default_value = "auto")]
        source: String,

        /// Session duration in seconds
        #[arg(short, long, default_value = "30.0")]
        duration: f64,

        /// Power mode preset overriding the sample rate: eco|balanced|performance
        #[arg(long)]
        power: Option<String>,

        /// Sampling rate (Hz) when no power mode is given
        #[arg(long)]
        rate: Option<u32>,

        #[command(flatten)]
        classifier: ClassifierArgs,
    },

    /// Classify a recorded sample stream offline
    Replay {
        /// Path to the samples.jsonl stream
        path: PathBuf,

        #[command(flatten)]
        classifier: ClassifierArgs,
    },

    /// Generate a synthetic sample stream for replay and testing
    Simulate {
        /// Output file path
        #[arg(short, long, default_value = "samples.jsonl")]
        output: PathBuf,

        /// Stream duration in seconds
        #[arg(short, long, default_value = "60.0")]
        duration: f64,

        /// Sampling rate (Hz)
        #[arg(long)]
        rate: Option<u32>,

        /// Seconds per activity phase (stationary/walking/running cycle)
        #[arg(long, default_value = "8.0")]
        phase: f64,
    },

    /// Show the effective configuration, optionally writing it to disk
    Config {
        /// Write the effective configuration to its standard location
        #[arg(long)]
        init: bool,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    stridesense_common::logging::init_logging(&LoggingConfig {
        level: log_level.to_string(),
        json: false,
    });

    let app_config = AppConfig::load();

    match cli.command {
        Commands::Monitor {
            source,
            duration,
            power,
            rate,
            classifier,
        } => {
            let (stationary, walking, cooldown, window) =
                classifier.resolve(&app_config.monitoring);
            let rate = rate.unwrap_or(app_config.monitoring.sample_rate_hz);
            commands::monitor::run(
                source, duration, power, rate, stationary, walking, cooldown, window,
            )
            .await
        }
        Commands::Replay { path, classifier } => {
            let (stationary, walking, cooldown, window) =
                classifier.resolve(&app_config.monitoring);
            commands::replay::run(path, stationary, walking, cooldown, window)
        }
        Commands::Simulate {
            output,
            duration,
            rate,
            phase,
        } => {
            let rate = rate.unwrap_or(app_config.monitoring.sample_rate_hz);
            commands::simulate::run(output, duration, rate, phase)
        }
        Commands::Config { init } => commands::config::run(init),
        Commands::Check => commands::check::run(),
    }
}
