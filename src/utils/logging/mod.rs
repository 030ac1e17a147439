//! Logging utilities
//!
//! Installs the global `tracing` subscriber for the command-line driver.

use crate::config::{LogFormat, LoggingSettings};
use crate::utils::error::{BatchError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| {
            BatchError::Config(format!("Invalid log level '{}': {}", settings.level, e))
        }),
    }
}

/// Initialize the global tracing subscriber
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = build_filter(settings)?;

    let installed = match settings.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
    };

    installed.map_err(|e| BatchError::Config(format!("Failed to install logger: {}", e)))
}
