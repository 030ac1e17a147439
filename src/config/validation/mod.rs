//! Configuration validation
//!
//! Each configuration section checks its own invariants.

use super::models::*;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for BatchSettings {
    fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("batch.model must not be empty".to_string());
        }
        if self.chunk_size == 0 {
            return Err("batch.chunk_size must be >= 1".to_string());
        }
        if !self.endpoint.starts_with('/') {
            return Err(format!(
                "batch.endpoint must be an absolute path, got '{}'",
                self.endpoint
            ));
        }
        validate_completion_window(&self.completion_window)?;
        if matches!(&self.reasoning_effort, Some(effort) if effort.trim().is_empty()) {
            return Err("batch.reasoning_effort must not be blank when set".to_string());
        }
        Ok(())
    }
}

impl Validate for StorageSettings {
    fn validate(&self) -> Result<(), String> {
        if self.state_file.as_os_str().is_empty() {
            return Err("storage.state_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for crate::core::providers::GroqConfig {
    fn validate(&self) -> Result<(), String> {
        // The API key is only required once a client is built
        if self.timeout == 0 {
            return Err("provider.timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Completion windows are whole hours, e.g. `24h`
fn validate_completion_window(window: &str) -> Result<(), String> {
    let hours = window
        .strip_suffix('h')
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0);
    match hours {
        Some(_) => Ok(()),
        None => Err(format!(
            "batch.completion_window must look like '24h', got '{}'",
            window
        )),
    }
}
