// Report shaping
pub const REJECTION_NAME: &str = "Promise rejection";
pub const PANIC_NAME: &str = "panic";
pub const REJECTION_HEADER_PATTERN: &str = r"Potentially\sunhandled\srejection\s*\[\d\]\s*";

// Default sink options, merged under caller overrides
pub const ALLOW_INSECURE_SUBMISSIONS: bool = true;
pub const IGNORE_AJAX_ABORT: bool = false;
pub const IGNORE_AJAX_ERROR: bool = false;
pub const IGNORE_3RD_PARTY_ERRORS: bool = true;
pub const EXCLUDED_HOSTNAMES: [&str; 2] = ["localhost", r"\.dev"];

// Configuration sources
pub const CONFIG_FILE_NAME: &str = "crash-relay.toml";
pub const ENV_PREFIX: &str = "CRASH_RELAY";
pub const API_KEY_ENV_VAR: &str = "CRASH_RELAY_API_KEY";
pub const ENVIRONMENT_ENV_VAR: &str = "CRASH_RELAY_ENVIRONMENT";

// Logging
pub const LOG_DIR: &str = "/tmp/crash-relay";
pub const LOG_FILE_NAME: &str = "crash-relay.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

// Sentry
pub const CUSTOM_DATA_EXTRA_KEY: &str = "custom_data";
pub const STACK_EXTRA_KEY: &str = "stack";
pub const THIRD_PARTY_SCRIPT_MESSAGE: &str = "Script error";
pub const HTTP_CLIENT_ERROR_TYPES: [&str; 2] = ["reqwest", "hyper"];
