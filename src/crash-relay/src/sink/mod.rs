//! The crash-reporting client seam.
//!
//! A sink receives the api key and merged options once per `start`, a custom
//! data provider, and then every report. Delivery, retries and the wire
//! protocol are entirely the sink's business.

mod filters;
mod sentry_sink;

pub use filters::EventFilters;
pub use sentry_sink::SentrySink;

use crate::config::SinkOptions;
use crate::report::ReportPayload;
use anyhow::Result;
use mockall::automock;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};

/// Application-specific fields attached to every report.
pub type CustomData = Map<String, Value>;

/// Called by the sink at report time.
pub type DataProvider = Arc<dyn Fn() -> CustomData + Send + Sync>;

pub fn empty_data_provider() -> DataProvider {
    Arc::new(|| CustomData::new())
}

#[automock]
pub trait ReportSink: Send + Sync {
    /// Configure the client with the api key and merged options.
    fn init(&self, api_key: &str, options: &SinkOptions) -> Result<()>;

    /// Register the provider whose record is attached to each payload.
    fn with_custom_data(&self, provider: DataProvider);

    /// Start accepting and delivering reports.
    fn attach(&self) -> Result<()>;

    fn detach(&self);

    fn send(&self, payload: ReportPayload);
}

static GLOBAL_SINK: Lazy<RwLock<Option<Arc<dyn ReportSink>>>> = Lazy::new(|| RwLock::new(None));

/// Make `sink` the process-wide client used by services that are not handed one.
pub fn install_global(sink: Arc<dyn ReportSink>) {
    let mut slot = GLOBAL_SINK.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(sink);
}

pub fn uninstall_global() -> Option<Arc<dyn ReportSink>> {
    let mut slot = GLOBAL_SINK.write().unwrap_or_else(|e| e.into_inner());
    slot.take()
}

pub fn global() -> Option<Arc<dyn ReportSink>> {
    GLOBAL_SINK
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}
