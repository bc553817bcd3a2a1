use crate::config::ConfigLoader;
use crate::logging::setup_logging;
use crate::report::FailureInput;
use crate::service::ErrorReportingService;
use crate::sink::SentrySink;
use crate::{success_message, warning_message};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub async fn send(config_path: Option<&Path>, log_dir: &Path, text: &str, json: bool) -> Result<()> {
    setup_logging(log_dir)?;

    let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;

    SentrySink::install();
    let service = ErrorReportingService::from_config(config)?;
    service.start().await?;

    let failure = read_failure(text, json)?;
    if service.config().environment().is_dev() {
        warning_message!("Environment is dev, the report is not delivered");
    }
    service.report(failure);
    service.stop();

    success_message!("Report handed to the crash reporting sink");
    Ok(())
}

fn read_failure(text: &str, json: bool) -> Result<FailureInput> {
    let text = if text == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read the failure from stdin")?;
        buffer
    } else {
        text.to_string()
    };

    if json {
        let value: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse the failure as JSON")?;
        return Ok(FailureInput::Structured(value));
    }
    Ok(FailureInput::RawString(text))
}
