use crate::config::ConfigLoader;
use crate::{info_message, success_message};
use anyhow::{Context, Result};
use std::path::Path;

pub fn check(config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;
    let options = config.merged_sink_options()?;

    info_message!("Environment: {}", config.environment());
    info_message!("Api key: {}", redact(config.api_key()));
    if config.environment().is_dev() {
        info_message!("Reports stay local, the console monitor is loaded instead");
    }
    println!("{}", serde_json::to_string_pretty(&options)?);

    success_message!("Configuration is valid");
    Ok(())
}

fn redact(api_key: &str) -> String {
    let visible: String = api_key.chars().take(8).collect();
    if visible.len() == api_key.len() {
        "*".repeat(api_key.len())
    } else {
        format!("{}...", visible)
    }
}
