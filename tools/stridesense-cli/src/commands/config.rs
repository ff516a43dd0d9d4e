//! Show or initialize the on-disk configuration.

use stridesense_common::config::AppConfig;

pub fn run(init: bool) -> anyhow::Result<()> {
    let path = AppConfig::path();
    let config = AppConfig::load();

    if init {
        config.save()?;
        println!("Wrote {}", path.display());
    } else if path.exists() {
        println!("Config: {}", path.display());
    } else {
        println!(
            "No config at {} (using defaults; pass --init to create it)",
            path.display()
        );
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
