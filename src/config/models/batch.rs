//! Batch request configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Settings shaping every rendered request and every bulk pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Model identifier placed in each request body
    #[serde(default = "default_model")]
    pub model: String,
    /// Records per batch
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Remote job deadline, e.g. `24h`
    #[serde(default = "default_completion_window")]
    pub completion_window: String,
    /// Endpoint the provider runs each line against
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Reasoning effort; omitted from the request body when unset
    #[serde(default = "default_reasoning_effort")]
    pub reasoning_effort: Option<String>,
    /// System instruction sent ahead of each record
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Keep going after a unit fails instead of aborting the pass
    #[serde(default)]
    pub continue_on_error: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            chunk_size: default_chunk_size(),
            completion_window: default_completion_window(),
            endpoint: default_endpoint(),
            reasoning_effort: default_reasoning_effort(),
            system_prompt: default_system_prompt(),
            continue_on_error: false,
        }
    }
}
