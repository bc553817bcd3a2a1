use crate::constants::LOG_DIR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "crash-relay",
    about = "Forward unhandled failures to a crash reporting backend",
    version
)]
pub struct Cli {
    /// Configuration file; defaults to crash-relay.toml in the working directory
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(long, global = true, default_value = LOG_DIR)]
    pub log_dir: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Shows the resolved configuration and the merged sink options
    Check,

    /// Start the service, report a failure and stop again
    Send {
        /// Failure text, or `-` to read it from stdin
        text: String,

        /// Parse the text as a structured JSON record
        #[clap(long)]
        json: bool,
    },
}
