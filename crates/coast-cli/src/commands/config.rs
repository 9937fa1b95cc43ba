use anyhow::Result;

use coast_core::{AppConfig, Tunable};

pub fn show(config: &AppConfig) -> Result<()> {
    let kinetic = &config.kinetic;
    println!("Configuration: {}\n", AppConfig::config_path().display());

    for tunable in Tunable::ALL {
        let value = tunable.get(kinetic);
        println!(
            "  {:<20} {:>10}   slider {:>3}%  (default {}, max {})",
            tunable.name(),
            value,
            tunable.position(value),
            tunable.default_value(),
            tunable.max_value()
        );
    }
    println!("  {:<20} {:>10}", "sample_history_capacity", kinetic.sample_history_capacity);
    println!("  {:<20} {:>10}", "frame_interval_ms", kinetic.frame_interval_ms);
    println!("  {:<20} {:>10}", "settle_window_ms", kinetic.settle_window_ms);
    println!("\n  {:<20} {:>10}", "lines_per_notch", config.ui.lines_per_notch);
    println!("  {:<20} {:>10}", "log file", config.log_path().display());

    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub fn reset(config: &AppConfig) -> Result<()> {
    let mut config = config.clone();
    config.reset_defaults();
    config.save()?;
    tracing::info!("Kinetic constants reset to defaults");
    println!("Kinetic constants reset to defaults.");
    Ok(())
}

pub fn set(config: &AppConfig, key: &str, value: &str) -> Result<()> {
    let mut config = config.clone();
    config.kinetic.set(key, value)?;
    config.save()?;

    let shown = Tunable::from_name(key)
        .map(|t| t.get(&config.kinetic).to_string())
        .unwrap_or_else(|| value.to_string());
    tracing::info!(key, value = %shown, "Kinetic constant updated");
    println!("{} = {}", key, shown);
    Ok(())
}
