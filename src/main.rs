//! litebatch - batch driver for OpenAI-compatible LLM batch APIs

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use litebatch::cli::Cli;
use litebatch::utils::logging::init_tracing;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Alternate Display prints the whole context chain
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // Values from .env take precedence over the process environment
    let _ = dotenvy::dotenv_override();

    let cli = Cli::parse();
    let config = cli
        .load_config()
        .await
        .context("failed to load configuration")?;
    init_tracing(&config.logging)?;
    debug!(build = %litebatch::build_info(), "Starting litebatch");
    match &cli.config {
        Some(path) => debug!(path = %path.display(), "Loaded configuration"),
        None => debug!("Loaded configuration from the environment"),
    }

    cli.run(config).await
}
