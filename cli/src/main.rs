use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use illustraia::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    pretty_env_logger::init();
    illustraia::run(Cli::parse()).await
}
