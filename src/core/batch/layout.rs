//! On-disk layout of a profile folder
//!
//! [`BatchLayout::ensure_dirs`] is blocking and is called from the synchronous
//! [`BatchRegistry::create`](super::BatchRegistry::create).

use crate::config::Profile;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Folder holding rendered request files
pub const BATCHES_FOLDER: &str = "batches";
/// Folder holding downloaded output files
pub const OUTPUT_FOLDER: &str = "output";

/// Filesystem layout of one profile.
///
/// Request files live under `<root>/batches/<start>_<end>.jsonl`, results under
/// `<root>/output/<start>_<end>.jsonl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLayout {
    root: PathBuf,
}

impl BatchLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Layout for a profile folder under `base_dir`
    pub fn for_profile(base_dir: &Path, profile: Profile) -> Self {
        Self::new(base_dir.join(profile.as_str()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.root.join(BATCHES_FOLDER)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(OUTPUT_FOLDER)
    }

    pub fn request_path(&self, filename: &str) -> PathBuf {
        self.batches_dir().join(filename)
    }

    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir().join(filename)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.batches_dir())?;
        std::fs::create_dir_all(self.output_dir())?;
        Ok(())
    }
}
