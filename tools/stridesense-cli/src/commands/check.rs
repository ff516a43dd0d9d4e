//! Check system capabilities for live monitoring.

use stridesense_common::config::AppConfig;
use stridesense_sample_source::power::PowerMode;

pub fn run() -> anyhow::Result<()> {
    println!("StrideSense system check\n");

    #[cfg(target_os = "linux")]
    {
        use stridesense_sample_source::sources::IioSource;
        if IioSource::is_supported() {
            println!("  Accelerometer: IIO device found");
        } else {
            println!("  Accelerometer: not found (monitor falls back to the simulator)");
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        println!("  Accelerometer: live capture is Linux-only (simulator available)");
    }

    let config = AppConfig::load();
    println!("\n  Defaults:");
    println!("    Sample rate:          {} Hz", config.monitoring.sample_rate_hz);
    println!("    Window size:          {}", config.monitoring.window_size);
    println!(
        "    Thresholds:           {:.2} / {:.2} g",
        config.monitoring.stationary_threshold, config.monitoring.walking_threshold
    );
    println!("    Cooldown:             {:.1}s", config.monitoring.cooldown_secs);
    println!("    Streams directory:    {}", config.streams_dir.display());

    println!("\n  Power modes:");
    for mode in [PowerMode::Eco, PowerMode::Balanced, PowerMode::Performance] {
        println!(
            "    {:<12} {:>2} Hz  ({}x drain)",
            format!("{mode:?}"),
            mode.sample_rate_hz(),
            mode.drain_multiplier()
        );
    }

    Ok(())
}
