use thiserror::Error;

/// Construction-time failures. Fatal, surfaced synchronously, no partial service.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Requires api key: the crash reporting api key is missing or empty")]
    MissingApiKey,

    #[error("Requires environment: no environment tag was provided")]
    MissingEnvironment,

    #[error("Environment must be a string, got {found}")]
    EnvironmentNotString { found: String },

    #[error("Requires a report sink: none was injected and no global sink is installed")]
    SinkUnavailable,

    #[error("Invalid sink options: {0}")]
    InvalidSinkOptions(#[source] serde_json::Error),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
