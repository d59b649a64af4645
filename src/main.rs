// src/main.rs

use anyhow::Result;
use clap::Parser;

use devloop::cli::CliArgs;
use devloop::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level)?;
    devloop::run(args).await
}
