//! Generate a synthetic sample stream for replay and testing.

use std::path::PathBuf;

use stridesense_motion_model::SampleStreamHeader;
use stridesense_sample_source::sources::SimulatedSource;
use stridesense_sample_source::writer::StreamWriter;

pub fn run(output: PathBuf, duration: f64, rate: u32, phase: f64) -> anyhow::Result<()> {
    if duration <= 0.0 {
        anyhow::bail!("Duration must be positive, got {duration}");
    }

    let samples = SimulatedSource::generate(rate, phase, duration);

    let header = SampleStreamHeader {
        schema_version: "1.0".to_string(),
        epoch_wall: chrono_now(),
        sample_rate_hz: rate,
        source: "simulated".to_string(),
    };

    let mut writer = StreamWriter::new(output.clone(), header)
        .map_err(|e| anyhow::anyhow!("Failed to create stream: {e}"))?;
    for sample in &samples {
        writer.write_sample(sample)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} samples ({duration:.0}s at {rate} Hz) to {}",
        writer.samples_written(),
        output.display()
    );

    Ok(())
}

fn chrono_now() -> String {
    stridesense_common::clock::SessionClock::start()
        .epoch_wall()
        .to_string()
}
