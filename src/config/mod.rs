//! Configuration management for the batch driver
//!
//! Configuration is read from a YAML file (every field optional), then
//! environment overrides are applied, then the result is validated.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::providers::GroqConfig;
use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote provider access
    #[serde(default)]
    pub provider: GroqConfig,
    /// Request rendering and pass behaviour
    #[serde(default)]
    pub batch: BatchSettings,
    /// Where files and the snapshot live
    #[serde(default)]
    pub storage: StorageSettings,
    /// Log output
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BatchError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without applying overrides or validation
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| BatchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply `LITEBATCH_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(model) = env::var("LITEBATCH_MODEL") {
            self.batch.model = model;
        }
        if let Ok(size) = env::var("LITEBATCH_CHUNK_SIZE") {
            self.batch.chunk_size = size
                .parse()
                .map_err(|e| BatchError::Config(format!("Invalid chunk size: {}", e)))?;
        }
        if let Ok(window) = env::var("LITEBATCH_COMPLETION_WINDOW") {
            self.batch.completion_window = window;
        }
        if let Ok(profile) = env::var("LITEBATCH_PROFILE") {
            self.storage.profile = profile.parse().map_err(BatchError::Config)?;
        }
        if let Ok(base_dir) = env::var("LITEBATCH_BASE_DIR") {
            self.storage.base_dir = PathBuf::from(base_dir);
        }
        if let Ok(state_file) = env::var("LITEBATCH_STATE_FILE") {
            self.storage.state_file = PathBuf::from(state_file);
        }
        if let Ok(level) = env::var("LITEBATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LITEBATCH_LOG_FORMAT") {
            self.logging.format = match format.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(BatchError::Config(format!(
                        "Invalid log format '{}', expected text or json",
                        other
                    )));
                }
            };
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.batch
            .validate()
            .map_err(|e| BatchError::Config(format!("Batch config error: {}", e)))?;
        self.storage
            .validate()
            .map_err(|e| BatchError::Config(format!("Storage config error: {}", e)))?;
        Validate::validate(&self.provider)
            .map_err(|e| BatchError::Config(format!("Provider config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BatchError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
