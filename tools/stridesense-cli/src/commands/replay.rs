//! Classify a recorded sample stream offline.

use std::path::PathBuf;

use stridesense_classify_core::{ActivityClassifier, ClassifierConfig, ShakeDetector};
use stridesense_common::clock::SessionClock;
use stridesense_common::error::StrideError;
use stridesense_motion_model::parse_samples;

pub fn run(
    path: PathBuf,
    stationary: f64,
    walking: f64,
    cooldown: f64,
    window: usize,
) -> anyhow::Result<()> {
    println!("Replaying stream: {}", path.display());

    if !path.exists() {
        return Err(StrideError::FileNotFound { path }.into());
    }
    let content = std::fs::read_to_string(&path)?;

    let samples = parse_samples(&content)
        .map_err(|e| StrideError::replay(format!("failed to parse {}: {e}", path.display())))?;

    println!("  Loaded {} samples", samples.len());

    if samples.is_empty() {
        println!("  No samples to classify.");
        return Ok(());
    }

    let config = ClassifierConfig {
        stationary_threshold: stationary,
        walking_threshold: walking,
        cooldown_secs: cooldown,
        window_size: window,
        ..Default::default()
    };
    let mut classifier = ActivityClassifier::new(config)
        .map_err(|e| anyhow::anyhow!("Invalid classifier configuration: {e}"))?;
    let mut shake = ShakeDetector::default();

    for sample in &samples {
        shake.detect(sample.timestamp_ns, sample.magnitude());
        if let Some(record) = classifier.ingest(sample) {
            println!(
                "  [{:7.2}s] -> {} (confidence {:.2})",
                SessionClock::ns_to_secs(record.timestamp_ns),
                record.activity,
                record.confidence
            );
        }
    }

    println!("\nReplay summary:");
    println!("  Final activity:     {}", classifier.current_activity());
    println!(
        "  Smoothed magnitude: {:.4} g",
        classifier.smoothed_magnitude()
    );
    println!("  Shakes:             {}", shake.count());
    println!(
        "  History ({} records, newest first):",
        classifier.history().len()
    );
    for record in classifier.history().iter() {
        println!(
            "    {:7.2}s  {:<10} {:.2}",
            SessionClock::ns_to_secs(record.timestamp_ns),
            record.activity.to_string(),
            record.confidence
        );
    }

    Ok(())
}
