use crate::constants::{DEFAULT_LOG_FILTER, LOG_FILE_NAME};
use crate::intercept::ConsoleErrorLayer;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

/// Install the global subscriber: a file log under `log_dir` plus the layer
/// that turns error-level events into unhandled-failure reports.
pub fn setup_logging(log_dir: &Path) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = build_subscriber(log_dir, filter)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!(
        "Logging system initialized. Writing to {:?}",
        log_dir.join(LOG_FILE_NAME)
    );

    Ok(())
}

/// `filter` only gates the file output. The interceptor sits after the file
/// layer and sees every error event, whatever the log level says.
fn build_subscriber(
    log_dir: &Path,
    filter: EnvFilter,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .context("Failed to create log file appender")?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_timer(SystemTime)
        .with_writer(file_appender)
        .with_filter(filter);

    Ok(tracing_subscriber::registry()
        .with(file_layer)
        .with(ConsoleErrorLayer::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::on_unhandled_error;
    use crate::report::FailureInput;
    use serial_test::serial;
    use std::sync::{Arc, Mutex};

    fn log_contents(dir: &Path) -> String {
        std::fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap_or_default()
    }

    #[test]
    #[serial]
    fn test_silenced_log_still_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let subscriber = build_subscriber(dir.path(), EnvFilter::new("off")).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let _subscription = on_unhandled_error(move |failure| {
            if let FailureInput::RawString(text) = failure {
                record.lock().unwrap().push(text.clone());
            }
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "host_app", "quiet failure");
        });

        assert_eq!(*seen.lock().unwrap(), vec!["quiet failure"]);
        assert!(!log_contents(dir.path()).contains("quiet failure"));
    }

    #[test]
    #[serial]
    fn test_log_line_is_written_before_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let subscriber = build_subscriber(dir.path(), EnvFilter::new("info")).unwrap();

        let logged_first = Arc::new(Mutex::new(Vec::new()));
        let record = logged_first.clone();
        let log_dir = dir.path().to_path_buf();
        let _subscription = on_unhandled_error(move |_| {
            let written = log_contents(&log_dir).contains("ordered failure");
            record.lock().unwrap().push(written);
        });

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "host_app", "ordered failure");
        });

        assert_eq!(*logged_first.lock().unwrap(), vec![true]);
    }
}
