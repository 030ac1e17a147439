//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Folder profile for request and output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Lite,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Lite => "lite",
            Profile::Full => "full",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lite" => Ok(Profile::Lite),
            "full" => Ok(Profile::Full),
            other => Err(format!("Unknown profile '{}', expected lite or full", other)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the profile folders
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Which profile folder to use
    #[serde(default)]
    pub profile: Profile,
    /// Registry snapshot file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            profile: Profile::default(),
            state_file: default_state_file(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}
