use super::failure::NativeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform crash report shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub name: String,
    pub message: String,
    pub stack: String,
}

impl NormalizedReport {
    pub fn new(name: impl Into<String>, message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Stack text split back into its lines, without empty trailing lines.
    pub fn stack_lines(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.stack.split('\n').filter(|line| !line.trim().is_empty())
    }
}

/// What a sink receives from `report`.
#[derive(Clone)]
pub enum ReportPayload {
    Error(NativeError),
    Report(NormalizedReport),
}

impl ReportPayload {
    pub fn as_report(&self) -> Option<&NormalizedReport> {
        match self {
            ReportPayload::Report(report) => Some(report),
            ReportPayload::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&NativeError> {
        match self {
            ReportPayload::Error(error) => Some(error),
            ReportPayload::Report(_) => None,
        }
    }

    /// One-line summary used in log output.
    pub fn summary(&self) -> String {
        match self {
            ReportPayload::Error(error) => error.to_string(),
            ReportPayload::Report(report) => format!("{}: {}", report.name, report.message),
        }
    }
}

impl fmt::Debug for ReportPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPayload::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
            ReportPayload::Report(report) => f.debug_tuple("Report").field(report).finish(),
        }
    }
}
