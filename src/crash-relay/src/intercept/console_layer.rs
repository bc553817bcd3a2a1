use super::hub::dispatch;
use crate::report::FailureInput;
use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Forwards every error-level log event to the unhandled-error hub.
///
/// Sits next to the regular output layers, so the original log line is
/// written as usual and the report is an extra side effect. Events emitted by
/// this crate are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleErrorLayer;

impl ConsoleErrorLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Subscriber> Layer<S> for ConsoleErrorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != Level::ERROR || is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        dispatch(FailureInput::RawString(visitor.into_text()));
    }
}

/// This crate's root module or one of its submodules; a host crate that
/// merely shares the name prefix is not ours.
fn is_own_target(target: &str) -> bool {
    const OWN: &str = env!("CARGO_CRATE_NAME");
    target
        .strip_prefix(OWN)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    /// Message first, structured fields appended to the first line so the
    /// rest of a multi-line message stays intact as stack text.
    fn into_text(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }

        let fields = self.fields.join(" ");
        match self.message.split_once('\n') {
            Some((title, rest)) => format!("{} {}\n{}", title, fields, rest),
            None if self.message.is_empty() => fields,
            None => format!("{} {}", self.message, fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
