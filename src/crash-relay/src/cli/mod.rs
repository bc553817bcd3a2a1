pub mod commands;
mod handlers;
pub mod message;

pub use commands::{Cli, Command};

use anyhow::Result;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Check => handlers::check(cli.config.as_deref()),
        Command::Send { text, json } => {
            handlers::send(cli.config.as_deref(), &cli.log_dir, &text, json).await
        }
    }
}
