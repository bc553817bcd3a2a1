pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod intercept;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod service;
pub mod sink;

pub use config::{ConfigLoader, Environment, ServiceConfig, SinkOptions};
pub use errors::ConfigurationError;
pub use intercept::{on_unhandled_error, spawn_supervised, ConsoleErrorLayer, Subscription};
pub use report::{FailureInput, NormalizedReport, ReportPayload};
pub use service::{ErrorReportingService, ServiceBuilder};
pub use sink::{CustomData, ReportSink, SentrySink};
