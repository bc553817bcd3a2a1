use clap::Parser;
use crash_relay::cli::{self, Cli};

pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tokio::runtime::Runtime::new()?.block_on(cli::run(cli))
}
