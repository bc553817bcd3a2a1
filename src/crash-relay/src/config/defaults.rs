use super::sink_options::SinkOptions;
use crate::constants::{
    ALLOW_INSECURE_SUBMISSIONS, EXCLUDED_HOSTNAMES, IGNORE_3RD_PARTY_ERRORS, IGNORE_AJAX_ABORT,
    IGNORE_AJAX_ERROR,
};
use serde_json::Map;

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            allow_insecure_submissions: ALLOW_INSECURE_SUBMISSIONS,
            ignore_ajax_abort: IGNORE_AJAX_ABORT,
            ignore_ajax_error: IGNORE_AJAX_ERROR,
            ignore_third_party_errors: IGNORE_3RD_PARTY_ERRORS,
            excluded_hostnames: EXCLUDED_HOSTNAMES.iter().map(|h| h.to_string()).collect(),
            extra: Map::new(),
        }
    }
}
