//! Command-line interface
//!
//! Each subcommand is one phase of the batch lifecycle. The registry is
//! carried between invocations in the snapshot file.

use crate::config::Config;
use crate::core::batch::{BatchLayout, BatchRegistry, read_snapshot};
use crate::core::providers::GroqBatchClient;
use crate::core::records::RecordSet;
use crate::core::scrape::fetch_website_contents;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Version string with build metadata
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ngit: ",
    env!("GIT_HASH"),
    "\nbuilt: ",
    env!("BUILD_TIME"),
    "\nrustc: ",
    env!("RUST_VERSION")
);

/// Batch driver for OpenAI-compatible LLM batch APIs
#[derive(Debug, Parser)]
#[command(name = "litebatch", version, long_version = LONG_VERSION, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "LITEBATCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Partition the records into batches and write a fresh snapshot
    Create {
        /// Records file, one JSON record per line
        #[arg(short, long)]
        records: PathBuf,
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Render, upload and submit the batches
    Submit {
        #[arg(short, long)]
        records: PathBuf,
        /// Only submit batches that have no remote job yet
        #[arg(long)]
        pending_only: bool,
    },
    /// Poll the batches and merge finished results into the records
    Fetch {
        #[arg(short, long)]
        records: PathBuf,
        /// Where to write the updated records (defaults to the input file).
        /// Later passes read from here once it exists
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show the state of every batch in the snapshot
    Status,
    /// Print the title and text of a web page
    Scrape {
        url: String,
    },
}

impl Cli {
    /// Load the configuration named on the command line, or from the
    /// environment when none is given
    pub async fn load_config(&self) -> crate::Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path).await,
            None => Config::from_env(),
        }
    }

    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Create { records, force } => create(&config, &records, force).await,
            Command::Submit {
                records,
                pending_only,
            } => submit(&config, &records, pending_only).await,
            Command::Fetch { records, out } => {
                fetch(&config, &records, out.as_deref().unwrap_or(records.as_path())).await
            }
            Command::Status => status(&config).await,
            Command::Scrape { url } => scrape(&config, &url).await,
        }
    }
}

async fn read_records(path: &Path) -> anyhow::Result<RecordSet> {
    RecordSet::read_jsonl(path)
        .await
        .with_context(|| format!("failed to read records from {}", path.display()))
}

async fn load_registry(config: &Config, records: &RecordSet) -> anyhow::Result<BatchRegistry> {
    let state_file = &config.storage.state_file;
    BatchRegistry::load(state_file, records)
        .await
        .with_context(|| format!("failed to load snapshot {}", state_file.display()))
}

fn client(config: &Config) -> anyhow::Result<GroqBatchClient> {
    GroqBatchClient::new(config.provider.clone()).context("failed to create the batch client")
}

async fn create(config: &Config, records_path: &Path, force: bool) -> anyhow::Result<()> {
    let state_file = &config.storage.state_file;
    if state_file.exists() && !force {
        bail!(
            "snapshot {} already exists, pass --force to replace it",
            state_file.display()
        );
    }

    let records = read_records(records_path).await?;
    let layout = BatchLayout::for_profile(&config.storage.base_dir, config.storage.profile);
    let mut registry = BatchRegistry::new(layout);
    let created = registry.create(&records, config.batch.chunk_size)?;
    registry.save(state_file).await?;

    println!(
        "Created {} batches over {} records in {}",
        created,
        records.len(),
        registry.layout().root().display()
    );
    Ok(())
}

async fn submit(config: &Config, records_path: &Path, pending_only: bool) -> anyhow::Result<()> {
    let records = read_records(records_path).await?;
    let mut registry = load_registry(config, &records).await?;
    let api = client(config)?;

    let outcome = if pending_only {
        registry.submit_pending(&api, &records, &config.batch).await
    } else {
        registry.run(&api, &records, &config.batch).await
    };
    registry
        .save(&config.storage.state_file)
        .await
        .context("failed to save snapshot")?;

    let report = outcome.context("submission pass failed")?;
    for failure in &report.failures {
        warn!(batch = %failure.unit, error = %failure.error, "Batch not submitted");
    }
    println!(
        "Submitted {} batches ({} skipped, {} failed)",
        report.submitted,
        report.skipped,
        report.failures.len()
    );
    Ok(())
}

/// Records file a fetch pass starts from.
///
/// Once a pass has written `out`, later passes continue from it so earlier
/// summaries are carried forward.
pub fn fetch_source<'a>(records: &'a Path, out: &'a Path) -> &'a Path {
    if out != records && out.is_file() {
        out
    } else {
        records
    }
}

async fn fetch(config: &Config, records_path: &Path, out: &Path) -> anyhow::Result<()> {
    let mut records = read_records(fetch_source(records_path, out)).await?;
    let mut registry = load_registry(config, &records).await?;
    let api = client(config)?;

    let outcome = registry.fetch(&api, &mut records, &config.batch).await;
    registry
        .save(&config.storage.state_file)
        .await
        .context("failed to save snapshot")?;
    records
        .write_jsonl(out)
        .await
        .with_context(|| format!("failed to write records to {}", out.display()))?;
    info!(path = %out.display(), "Wrote records");

    let report = outcome.context("fetch pass failed")?;
    for failure in &report.failures {
        warn!(batch = %failure.unit, error = %failure.error, "Batch not fetched");
    }
    println!("Finished {} of {} batches", report.finished, report.total);
    Ok(())
}

async fn status(config: &Config) -> anyhow::Result<()> {
    let state_file = &config.storage.state_file;
    let snapshot = read_snapshot(state_file)
        .await
        .with_context(|| format!("failed to read snapshot {}", state_file.display()))?;

    println!(
        "{} ({} records, saved {})",
        snapshot.root.display(),
        snapshot.record_count,
        snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for unit in &snapshot.units {
        println!(
            "  {:<16} {:<10} {}",
            unit.label(),
            unit.state().to_string(),
            unit.batch_id().unwrap_or("-")
        );
    }
    let (finished, total) = snapshot.progress();
    println!("Finished {} of {} batches", finished, total);
    Ok(())
}

async fn scrape(config: &Config, url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(config.provider.timeout())
        .build()
        .context("failed to create the HTTP client")?;

    match fetch_website_contents(&client, url).await {
        Some(contents) => {
            println!("{}", contents);
            Ok(())
        }
        None => bail!("could not fetch {}", url),
    }
}
