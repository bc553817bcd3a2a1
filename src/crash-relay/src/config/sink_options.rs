use crate::errors::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options handed to the sink's `init`, after merging caller overrides over
/// the defaults. Unknown keys are passed through in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SinkOptions {
    pub allow_insecure_submissions: bool,
    pub ignore_ajax_abort: bool,
    pub ignore_ajax_error: bool,
    #[serde(rename = "ignore_3rd_party_errors")]
    pub ignore_third_party_errors: bool,
    pub excluded_hostnames: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const KNOWN_KEYS: [&str; 5] = [
    "allow_insecure_submissions",
    "ignore_ajax_abort",
    "ignore_ajax_error",
    "ignore_3rd_party_errors",
    "excluded_hostnames",
];

impl SinkOptions {
    /// Overlay `overrides` on the defaults, key by key, caller winning.
    pub fn merged(overrides: &Map<String, Value>) -> Result<Self> {
        let mut options = match serde_json::to_value(SinkOptions::default())
            .map_err(ConfigurationError::InvalidSinkOptions)?
        {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (key, value) in overrides {
            options.insert(canonical_key(key), value.clone());
        }

        serde_json::from_value(Value::Object(options)).map_err(ConfigurationError::InvalidSinkOptions)
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Accepts `allowInsecureSubmissions`-style spellings for the known options.
fn canonical_key(key: &str) -> String {
    let folded = key.replace('_', "").to_lowercase();
    KNOWN_KEYS
        .iter()
        .find(|known| known.replace('_', "") == folded)
        .map(|known| known.to_string())
        .unwrap_or_else(|| key.to_string())
}
