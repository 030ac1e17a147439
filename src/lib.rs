//! # litebatch
//!
//! Drives an OpenAI-compatible LLM batch API over a list of product records:
//! records are split into fixed-size batches, rendered to JSONL request files,
//! uploaded, submitted as remote batch jobs, polled, downloaded and merged back
//! into the records as summaries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use litebatch::{BatchLayout, BatchRegistry, Config, GroqBatchClient, RecordSet};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = GroqBatchClient::new(config.provider.clone())?;
//!     let mut records = RecordSet::read_jsonl(Path::new("items.jsonl")).await?;
//!
//!     let layout = BatchLayout::for_profile(&config.storage.base_dir, config.storage.profile);
//!     let mut registry = BatchRegistry::new(layout);
//!     registry.create(&records, config.batch.chunk_size)?;
//!     registry.run(&client, &records, &config.batch).await?;
//!     registry.save(Path::new("batches.json")).await?;
//!
//!     // later, possibly in another process
//!     let mut registry = BatchRegistry::load(Path::new("batches.json"), &records).await?;
//!     let report = registry.fetch(&client, &mut records, &config.batch).await?;
//!     println!("Finished {} of {} batches", report.finished, report.total);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{BatchError, Result};

pub use core::batch::{
    BatchLayout, BatchRegistry, BatchUnit, FetchReport, RegistrySnapshot, RunReport, UnitState,
    partition,
};
pub use core::providers::{BatchApi, GroqBatchClient, GroqConfig, ProviderError};
pub use core::records::{Record, RecordSet};
pub use core::scrape::{extract_page_text, fetch_website_contents};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information exported by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time, seconds since the Unix epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (git {}, built {}, {})",
            self.version, self.git_hash, self.build_time, self.rust_version
        )
    }
}

/// Metadata recorded when this crate was built
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
