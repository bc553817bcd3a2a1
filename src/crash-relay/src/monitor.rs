//! Local diagnostic monitor used in the `dev` environment instead of the
//! crash reporting sink.

use crate::intercept::{on_unhandled_error, Subscription};
use crate::report::{normalize, FailureInput, ReportPayload};
use anyhow::Result;
use colored::Colorize;
use std::sync::Mutex;

#[async_trait::async_trait]
pub trait MonitorLoader: Send + Sync {
    async fn load(&self) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Prints unhandled failures to stderr. Nothing leaves the machine.
#[derive(Default)]
pub struct ConsoleMonitor {
    subscription: Mutex<Option<Subscription>>,
}

impl ConsoleMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[async_trait::async_trait]
impl MonitorLoader for ConsoleMonitor {
    async fn load(&self) -> Result<()> {
        tokio::task::yield_now().await;

        let subscription = on_unhandled_error(|failure| eprintln!("{}", render(failure)));
        let mut slot = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if slot.replace(subscription).is_some() {
            tracing::debug!("Console monitor reloaded");
        }
        tracing::info!("Console monitor loaded, crash reports stay local");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

fn render(failure: &FailureInput) -> String {
    match normalize(failure.clone()) {
        ReportPayload::Error(error) => format!("{} {}", "Unhandled error:".yellow().bold(), error),
        ReportPayload::Report(report) if report.stack.is_empty() => format!(
            "{} {}",
            format!("Unhandled {}:", report.name).yellow().bold(),
            report.message
        ),
        ReportPayload::Report(report) => format!(
            "{} {}\n{}",
            format!("Unhandled {}:", report.name).yellow().bold(),
            report.message,
            report.stack.dimmed()
        ),
    }
}
