mod config_loader;
mod defaults;
mod environment;
mod sink_options;

pub use config_loader::{ConfigLoader, ServiceConfig};
pub use environment::Environment;
pub use sink_options::SinkOptions;
