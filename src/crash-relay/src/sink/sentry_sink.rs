use super::filters::EventFilters;
use super::{install_global, DataProvider, ReportSink};
use crate::config::SinkOptions;
use crate::constants::{CUSTOM_DATA_EXTRA_KEY, STACK_EXTRA_KEY};
use crate::report::{NormalizedReport, ReportPayload};
use anyhow::{bail, Context, Result};
use sentry::protocol::{Event, Exception, Frame, Mechanism, Stacktrace};
use sentry::types::{Dsn, Scheme};
use sentry::{ClientInitGuard, ClientOptions, Level};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Sentry-backed sink. The api key is the project DSN.
#[derive(Default)]
pub struct SentrySink {
    client: Mutex<Option<ClientInitGuard>>,
    custom_data: Arc<RwLock<Option<DataProvider>>>,
    attached: AtomicBool,
}

impl SentrySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink and make it the process-wide client.
    pub fn install() -> Arc<Self> {
        let sink = Arc::new(Self::new());
        install_global(sink.clone());
        sink
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn client_options(&self, dsn: Dsn, options: &SinkOptions) -> Result<ClientOptions> {
        let filters = EventFilters::from_options(options)?;
        let custom_data = self.custom_data.clone();

        Ok(ClientOptions {
            dsn: Some(dsn),
            release: options
                .extra_str("release")
                .map(|release| release.to_string().into())
                .or_else(|| sentry::release_name!()),
            environment: options
                .extra_str("environment")
                .map(|environment| environment.to_string().into()),
            before_send: Some(Arc::new(move |mut event: Event<'static>| {
                if let Some(reason) = filters.drop_reason(&event) {
                    tracing::debug!("Dropping crash report {}: {}", event.event_id, reason);
                    return None;
                }

                let provider = custom_data
                    .read()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                if let Some(provider) = provider {
                    let data = provider();
                    if !data.is_empty() {
                        event
                            .extra
                            .insert(CUSTOM_DATA_EXTRA_KEY.to_string(), Value::Object(data));
                    }
                }
                Some(event)
            })),
            // panics and log events reach us through the interception hub instead
            default_integrations: false,
            ..Default::default()
        })
    }
}

impl ReportSink for SentrySink {
    fn init(&self, api_key: &str, options: &SinkOptions) -> Result<()> {
        let dsn: Dsn = api_key
            .parse()
            .context("crash reporting api key is not a valid Sentry DSN")?;

        if dsn.scheme() == Scheme::Http && !options.allow_insecure_submissions {
            bail!("insecure submissions are disabled but the DSN uses plain http");
        }

        let client_options = self.client_options(dsn, options)?;
        let guard = sentry::init(client_options);

        let mut client = self.client.lock().unwrap_or_else(|e| e.into_inner());
        if client.replace(guard).is_some() {
            tracing::debug!("Replaced a previously initialised Sentry client");
        }
        tracing::info!("Sentry client initialised");
        Ok(())
    }

    fn with_custom_data(&self, provider: DataProvider) {
        let mut slot = self.custom_data.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(provider);
    }

    fn attach(&self) -> Result<()> {
        let client = self.client.lock().unwrap_or_else(|e| e.into_inner());
        if client.is_none() {
            bail!("attach called before the Sentry client was initialised");
        }

        sentry::configure_scope(|scope| {
            scope.set_tag("os", std::env::consts::OS);
            scope.set_tag("arch", std::env::consts::ARCH);
        });
        self.attached.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn detach(&self) {
        let guard = self
            .client
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        self.attached.store(false, Ordering::SeqCst);

        match guard {
            // dropping the guard flushes queued events and closes the client
            Some(guard) => {
                drop(guard);
                tracing::info!("Sentry client detached");
            }
            None => tracing::warn!("Detach called on a Sentry sink that was never initialised"),
        }
    }

    fn send(&self, payload: ReportPayload) {
        let summary = payload.summary();
        if !self.is_attached() {
            tracing::debug!("Sentry sink is detached, dropping crash report: {}", summary);
            return;
        }

        let event_id = sentry::capture_event(event_from_payload(&payload));
        tracing::debug!("Captured crash report {}: {}", event_id, summary);
    }
}

pub fn event_from_payload(payload: &ReportPayload) -> Event<'static> {
    match payload {
        ReportPayload::Error(error) => {
            let mut event = sentry::event_from_error(&**error);
            event.level = Level::Error;
            event
        }
        ReportPayload::Report(report) => event_from_report(report),
    }
}

fn event_from_report(report: &NormalizedReport) -> Event<'static> {
    // stack text lists the innermost call first; Sentry wants it last
    let frames: Vec<Frame> = report
        .stack_lines()
        .map(|line| Frame {
            function: Some(line.trim().trim_start_matches("at ").to_string()),
            ..Default::default()
        })
        .rev()
        .collect();

    let exception = Exception {
        ty: report.name.clone(),
        value: Some(report.message.clone()),
        stacktrace: (!frames.is_empty()).then(|| Stacktrace {
            frames,
            ..Default::default()
        }),
        mechanism: Some(Mechanism {
            ty: "crash-relay".into(),
            handled: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut event = Event {
        exception: vec![exception].into(),
        level: Level::Error,
        ..Default::default()
    };
    if !report.stack.is_empty() {
        event
            .extra
            .insert(STACK_EXTRA_KEY.to_string(), Value::String(report.stack.clone()));
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_invalid_dsn_is_rejected() {
        let sink = SentrySink::new();
        let result = sink.init("not a dsn", &SinkOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_insecure_dsn_rejected_when_disallowed() {
        let sink = SentrySink::new();
        let options = SinkOptions {
            allow_insecure_submissions: false,
            ..Default::default()
        };
        let err = sink
            .init("http://public@sentry.example.com/1", &options)
            .unwrap_err();
        assert!(err.to_string().contains("insecure submissions"));
    }

    #[test]
    fn test_attach_before_init_fails() {
        let sink = SentrySink::new();
        assert!(sink.attach().is_err());
        assert!(!sink.is_attached());
    }

    #[test]
    fn test_send_is_dropped_while_detached() {
        let sink = SentrySink::new();
        let payload = ReportPayload::Report(NormalizedReport::new("Promise rejection", "early", ""));

        let events = sentry::test::with_captured_events(|| sink.send(payload.clone()));
        assert!(events.is_empty());

        sink.attached.store(true, Ordering::SeqCst);
        let events = sentry::test::with_captured_events(|| sink.send(payload.clone()));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].exception.values[0].value.as_deref(), Some("early"));

        sink.detach();
        let events = sentry::test::with_captured_events(|| sink.send(payload));
        assert!(events.is_empty());
    }

    #[test]
    fn test_report_event_shape() {
        let payload = ReportPayload::Report(NormalizedReport::new(
            "Promise rejection",
            "Error: boom",
            "at inner.js:1\nat outer.js:2\n",
        ));
        let event = event_from_payload(&payload);

        assert_eq!(event.level, Level::Error);
        let exception = &event.exception.values[0];
        assert_eq!(exception.ty, "Promise rejection");
        assert_eq!(exception.value.as_deref(), Some("Error: boom"));

        let functions: Vec<_> = exception
            .stacktrace
            .as_ref()
            .unwrap()
            .frames
            .iter()
            .map(|f| f.function.clone().unwrap())
            .collect();
        assert_eq!(functions, vec!["outer.js:2", "inner.js:1"]);
        assert_eq!(
            event.extra.get(STACK_EXTRA_KEY),
            Some(&Value::String("at inner.js:1\nat outer.js:2\n".into()))
        );
    }

    #[test]
    fn test_report_without_stack_has_no_frames() {
        let payload = ReportPayload::Report(NormalizedReport::new("Promise rejection", "Just one line", ""));
        let event = event_from_payload(&payload);
        assert!(event.exception.values[0].stacktrace.is_none());
        assert!(event.extra.is_empty());
    }

    #[test]
    fn test_native_error_event() {
        let error: crate::report::NativeError = Arc::new(std::io::Error::other("disk full"));
        let event = event_from_payload(&ReportPayload::Error(error));
        assert_eq!(event.level, Level::Error);
        assert_eq!(event.exception.values[0].value.as_deref(), Some("disk full"));
    }
}
