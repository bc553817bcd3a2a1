use crate::config::ServiceConfig;
use crate::errors::{ConfigurationError, Result as ConfigResult};
use crate::intercept::{on_unhandled_error, panic_hook, Subscription};
use crate::monitor::{ConsoleMonitor, MonitorLoader};
use crate::report::{normalize, FailureInput};
use crate::sink::{self, empty_data_provider, CustomData, DataProvider, ReportSink};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// Wires the host lifecycle to a crash reporting sink.
///
/// `start` attaches interception and configures the sink (or, in `dev`,
/// loads the local console monitor instead); `stop` detaches it again.
/// Everything else is `report`, which normalizes a failure and hands it to
/// the sink.
pub struct ErrorReportingService {
    config: ServiceConfig,
    sink: Arc<dyn ReportSink>,
    data_provider: DataProvider,
    monitor: Arc<dyn MonitorLoader>,
    capture_panics: bool,
    subscription: Mutex<Option<Subscription>>,
}

pub struct ServiceBuilder {
    config: Option<ServiceConfig>,
    api_key: Option<String>,
    environment: Option<Value>,
    sink_options: Map<String, Value>,
    sink: Option<Arc<dyn ReportSink>>,
    data_provider: Option<DataProvider>,
    monitor: Option<Arc<dyn MonitorLoader>>,
    capture_panics: bool,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            config: None,
            api_key: None,
            environment: None,
            sink_options: Map::new(),
            sink: None,
            data_provider: None,
            monitor: None,
            capture_panics: true,
        }
    }
}

impl ServiceBuilder {
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(Value::String(environment.into()));
        self
    }

    /// Untyped environment tag, as read from a loosely typed source.
    /// Anything but a string fails `build`.
    pub fn environment_value(mut self, environment: Value) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn sink_options(mut self, sink_options: Map<String, Value>) -> Self {
        self.sink_options = sink_options;
        self
    }

    /// Use this sink instead of the process-wide one.
    pub fn sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Contextual fields attached to every report.
    pub fn data_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> CustomData + Send + Sync + 'static,
    {
        self.data_provider = Some(Arc::new(provider));
        self
    }

    /// Monitor loaded in the `dev` environment; defaults to [`ConsoleMonitor`].
    pub fn monitor(mut self, monitor: Arc<dyn MonitorLoader>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn capture_panics(mut self, enabled: bool) -> Self {
        self.capture_panics = enabled;
        self
    }

    pub fn build(self) -> ConfigResult<ErrorReportingService> {
        let config = match self.config {
            Some(config) => config,
            None => ServiceConfig::from_parts(self.api_key, self.environment, self.sink_options)?,
        };

        let sink = self
            .sink
            .or_else(sink::global)
            .ok_or(ConfigurationError::SinkUnavailable)?;

        Ok(ErrorReportingService {
            config,
            sink,
            data_provider: self.data_provider.unwrap_or_else(empty_data_provider),
            monitor: self
                .monitor
                .unwrap_or_else(|| Arc::new(ConsoleMonitor::new())),
            capture_panics: self.capture_panics,
            subscription: Mutex::new(None),
        })
    }
}

impl ErrorReportingService {
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Construct against the process-wide sink.
    pub fn new(
        api_key: impl Into<String>,
        environment: impl Into<String>,
        sink_options: Map<String, Value>,
    ) -> ConfigResult<Self> {
        Self::builder()
            .api_key(api_key)
            .environment(environment)
            .sink_options(sink_options)
            .build()
    }

    pub fn from_config(config: ServiceConfig) -> ConfigResult<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub async fn start(&self) -> Result<()> {
        if self.config.environment().is_dev() {
            tracing::info!(
                "Environment is dev, loading the {} monitor instead of the crash reporting sink",
                self.monitor.name()
            );
            return self
                .monitor
                .load()
                .await
                .with_context(|| format!("Failed to load the {} monitor", self.monitor.name()));
        }

        // the slot stays locked until the new interception is in place, and the
        // previous one is gone before it registers
        let mut slot = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if slot.take().is_some() {
            tracing::debug!("Service restarted, dropped the previous interception");
        }

        // every unhandled failure is reported after its own log output
        let sink = self.sink.clone();
        let subscription = on_unhandled_error(move |failure| deliver(sink.as_ref(), failure.clone()));
        if self.capture_panics {
            panic_hook::install();
        }

        let options = self.config.merged_sink_options()?;

        self.sink
            .init(self.config.api_key(), &options)
            .context("Failed to initialise the crash reporting sink")?;
        self.sink.with_custom_data(self.data_provider.clone());
        self.sink
            .attach()
            .context("Failed to attach the crash reporting sink")?;

        *slot = Some(subscription);
        drop(slot);

        tracing::info!(
            "Crash reporting started for environment {}",
            self.config.environment()
        );
        Ok(())
    }

    /// Fields attached to every report; empty unless a provider was injected.
    pub fn get_data(&self) -> CustomData {
        (self.data_provider)()
    }

    pub fn report(&self, failure: impl Into<FailureInput>) {
        deliver(self.sink.as_ref(), failure.into());
    }

    pub fn stop(&self) {
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        drop(subscription);

        self.sink.detach();
        tracing::info!("Crash reporting stopped");
    }
}

fn deliver(sink: &dyn ReportSink, failure: FailureInput) {
    let kind = failure.kind();
    let payload = normalize(failure);
    tracing::debug!("Reporting {} as {}", kind, payload.summary());
    sink.send(payload);
}
