//! Groq Provider Configuration
//!
//! Configuration for Groq API access used by the batch client.

use serde::{Deserialize, Serialize};

/// Groq provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroqConfig {
    /// API key for Groq authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (default: https://api.groq.com/openai/v1)
    #[serde(default)]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            timeout: default_timeout(),
        }
    }
}

impl GroqConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // API key can come from environment variable
        if self.get_api_key().is_none() {
            return Err(
                "Groq API key not provided and GROQ_API_KEY environment variable not set"
                    .to_string(),
            );
        }

        if self.timeout == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get API key with environment variable fallback
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Get API base with environment variable fallback
    pub fn get_api_base(&self) -> String {
        self.api_base
            .clone()
            .or_else(|| std::env::var("GROQ_API_BASE").ok())
            .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Request timeout
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout)
    }
}

fn default_timeout() -> u64 {
    300
}
