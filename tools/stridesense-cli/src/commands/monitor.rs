//! Run a monitoring session against a live or simulated source.

use stridesense_classify_core::{ActivityClassifier, ClassifierConfig};
use stridesense_common::clock::SessionClock;
use stridesense_common::error::StrideError;
use stridesense_sample_source::power::PowerMode;
use stridesense_sample_source::sources::{detect_best_source, SimulatedSource};
use stridesense_sample_source::{MotionMonitor, SampleSource};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    source: String,
    duration: f64,
    power: Option<String>,
    rate: u32,
    stationary: f64,
    walking: f64,
    cooldown: f64,
    window: usize,
) -> anyhow::Result<()> {
    let rate_hz = match power {
        Some(mode) => {
            let mode: PowerMode = mode.parse()?;
            println!("Power mode: {mode:?} ({} Hz)", mode.sample_rate_hz());
            mode.sample_rate_hz()
        }
        None => rate,
    };

    let config = ClassifierConfig {
        stationary_threshold: stationary,
        walking_threshold: walking,
        cooldown_secs: cooldown,
        window_size: window,
        ..Default::default()
    };
    let classifier = ActivityClassifier::new(config)
        .map_err(|e| anyhow::anyhow!("Invalid classifier configuration: {e}"))?;

    let source: Box<dyn SampleSource> = match source.as_str() {
        "simulated" => Box::new(SimulatedSource::new(rate_hz, 8.0).with_shakes(15.0)),
        "auto" => detect_best_source(rate_hz),
        other => {
            return Err(StrideError::unsupported(format!(
                "unknown source '{other}' (expected auto|simulated)"
            ))
            .into())
        }
    };

    println!("Monitoring for {duration:.0}s at {rate_hz} Hz...");
    let session = SessionClock::start();

    let mut monitor = MotionMonitor::new(source, classifier, rate_hz);
    let mut transitions = monitor.transition_stream();
    let stop_flag = monitor.stop_flag();

    // Print transitions as they commit.
    let printer = tokio::spawn(async move {
        while let Some(record) = transitions.recv().await {
            println!(
                "  [{:7.2}s] -> {} (confidence {:.2})",
                SessionClock::ns_to_secs(record.timestamp_ns),
                record.activity,
                record.confidence
            );
        }
    });

    // End the session after the requested duration.
    let timer = tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs_f64(duration)).await;
        stop_flag.store(true, std::sync::atomic::Ordering::SeqCst);
    });

    let summary = monitor
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Monitoring failed: {e}"))?;

    timer.await.ok();
    drop(monitor);
    printer.await.ok();

    println!("\nSession summary ({:.1}s):", session.elapsed_secs());
    println!("  Samples processed:  {}", summary.samples_processed);
    println!("  Transitions:        {}", summary.transitions_committed);
    println!("  Shakes:             {}", summary.shakes_detected);
    println!("  Final activity:     {}", summary.last_activity);
    println!(
        "  Smoothed magnitude: {:.4} g",
        summary.last_smoothed_magnitude
    );

    Ok(())
}
