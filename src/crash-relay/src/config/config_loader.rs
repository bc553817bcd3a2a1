use super::environment::Environment;
use super::sink_options::SinkOptions;
use crate::constants::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::errors::{ConfigurationError, Result};
use config::{Config as RConfig, Environment as EnvSource, File, FileFormat};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Write-once service configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    api_key: String,
    environment: Environment,
    sink_options: Map<String, Value>,
}

/// Shape of the configuration before validation. The environment is kept as
/// a raw value so a non-string tag can be rejected instead of coerced.
#[derive(Debug, Default, Deserialize)]
struct RawServiceConfig {
    api_key: Option<String>,
    environment: Option<Value>,
    #[serde(default)]
    sink_options: Map<String, Value>,
}

impl ServiceConfig {
    pub fn new(
        api_key: impl Into<String>,
        environment: impl Into<String>,
        sink_options: Map<String, Value>,
    ) -> Result<Self> {
        Self::from_parts(
            Some(api_key.into()),
            Some(Value::String(environment.into())),
            sink_options,
        )
    }

    /// Build from an untyped record, e.g. `{"api_key": .., "environment": .., "sink_options": {..}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut record = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let api_key = match record.remove("api_key") {
            Some(Value::String(key)) => Some(key),
            _ => None,
        };
        let sink_options = match record.remove("sink_options") {
            Some(Value::Object(options)) => options,
            _ => Map::new(),
        };

        Self::from_parts(api_key, record.remove("environment"), sink_options)
    }

    pub fn from_parts(
        api_key: Option<String>,
        environment: Option<Value>,
        sink_options: Map<String, Value>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigurationError::MissingApiKey),
        };

        let environment = match environment {
            Some(Value::String(tag)) => Environment::parse(&tag),
            Some(Value::Null) | None => return Err(ConfigurationError::MissingEnvironment),
            Some(other) => {
                return Err(ConfigurationError::EnvironmentNotString {
                    found: other.to_string(),
                })
            }
        };

        // surface bad option types at construction rather than at start
        SinkOptions::merged(&sink_options)?;

        Ok(Self {
            api_key,
            environment,
            sink_options,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn sink_options(&self) -> &Map<String, Value> {
        &self.sink_options
    }

    pub fn merged_sink_options(&self) -> Result<SinkOptions> {
        SinkOptions::merged(&self.sink_options)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Layered load: `crash-relay.toml` in the working directory (or an explicit
    /// file, which must exist), then `CRASH_RELAY_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<ServiceConfig> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(PathBuf::from(CONFIG_FILE_NAME))
                .format(FileFormat::Toml)
                .required(false),
        };

        let raw: RawServiceConfig = RConfig::builder()
            .add_source(file)
            .add_source(EnvSource::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            "Loaded configuration: api key set = {}, environment = {:?}",
            raw.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            raw.environment
        );

        ServiceConfig::from_parts(raw.api_key, raw.environment, raw.sink_options)
    }
}
