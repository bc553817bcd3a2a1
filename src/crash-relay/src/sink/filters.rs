use crate::config::SinkOptions;
use crate::constants::{HTTP_CLIENT_ERROR_TYPES, THIRD_PARTY_SCRIPT_MESSAGE};
use anyhow::{Context, Result};
use regex::Regex;
use sentry::protocol::{Event, Exception};

/// Decides which events never leave the process, per the sink options.
#[derive(Debug, Clone)]
pub struct EventFilters {
    excluded_hostnames: Vec<Regex>,
    ignore_third_party_errors: bool,
    ignore_ajax_abort: bool,
    ignore_ajax_error: bool,
    local_hostname: Option<String>,
}

impl EventFilters {
    pub fn from_options(options: &SinkOptions) -> Result<Self> {
        let excluded_hostnames = options
            .excluded_hostnames
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid excluded hostname pattern `{}`", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            excluded_hostnames,
            ignore_third_party_errors: options.ignore_third_party_errors,
            ignore_ajax_abort: options.ignore_ajax_abort,
            ignore_ajax_error: options.ignore_ajax_error,
            local_hostname: sysinfo::System::host_name(),
        })
    }

    pub fn with_local_hostname(mut self, hostname: Option<String>) -> Self {
        self.local_hostname = hostname;
        self
    }

    pub fn is_excluded_host(&self, host: &str) -> bool {
        self.excluded_hostnames.iter().any(|re| re.is_match(host))
    }

    /// Returns the reason an event is dropped, or `None` to send it.
    pub fn drop_reason(&self, event: &Event<'_>) -> Option<&'static str> {
        if self.hosts_of(event).any(|host| self.is_excluded_host(host)) {
            return Some("excluded hostname");
        }

        let exceptions = &event.exception.values;

        if self.ignore_third_party_errors && is_third_party(event, exceptions) {
            return Some("third-party error");
        }

        let http_errors: Vec<&Exception> = exceptions.iter().filter(|e| is_http_client_error(e)).collect();
        if !http_errors.is_empty() {
            let aborted = http_errors.iter().any(|e| is_abort(e));
            if aborted && self.ignore_ajax_abort {
                return Some("aborted http request");
            }
            if !aborted && self.ignore_ajax_error {
                return Some("http request error");
            }
        }

        None
    }

    fn hosts_of<'a>(&'a self, event: &'a Event<'_>) -> impl Iterator<Item = &'a str> {
        let request_host = event
            .request
            .as_ref()
            .and_then(|request| request.url.as_ref())
            .and_then(|url| url.host_str());
        let server_name = event.server_name.as_deref();

        request_host
            .into_iter()
            .chain(server_name)
            .chain(self.local_hostname.as_deref())
    }
}

fn is_third_party(event: &Event<'_>, exceptions: &[Exception]) -> bool {
    let script_error = |text: &str| text.trim().starts_with(THIRD_PARTY_SCRIPT_MESSAGE);

    if event.message.as_deref().is_some_and(script_error)
        || exceptions
            .iter()
            .any(|e| e.value.as_deref().is_some_and(script_error))
    {
        return true;
    }

    // every frame of every exception belongs to somebody else's code
    !exceptions.is_empty()
        && exceptions.iter().all(|e| {
            e.stacktrace.as_ref().is_some_and(|stack| {
                !stack.frames.is_empty() && stack.frames.iter().all(|f| f.in_app == Some(false))
            })
        })
}

fn is_http_client_error(exception: &Exception) -> bool {
    let ty = exception.ty.to_lowercase();
    HTTP_CLIENT_ERROR_TYPES.iter().any(|marker| ty.contains(marker))
}

fn is_abort(exception: &Exception) -> bool {
    let value = exception.value.as_deref().unwrap_or_default().to_lowercase();
    ["aborted", "canceled", "cancelled"]
        .iter()
        .any(|word| value.contains(word))
}
