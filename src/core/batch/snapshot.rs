//! Registry persistence
//!
//! A snapshot stores the units and where their files live, never the records.
//! Loading binds it to the record set the caller passes in.

use super::layout::BatchLayout;
use super::registry::BatchRegistry;
use super::unit::BatchUnit;
use crate::core::records::RecordSet;
use crate::utils::error::{BatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Snapshot format version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized view of a [`BatchRegistry`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Profile folder holding the request and output files
    pub root: PathBuf,
    /// Number of records the units were created over
    pub record_count: usize,
    pub units: Vec<BatchUnit>,
}

impl RegistrySnapshot {
    pub fn of(registry: &BatchRegistry) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            root: registry.layout().root().to_path_buf(),
            record_count: registry.record_count(),
            units: registry.units().to_vec(),
        }
    }

    /// `(finished, total)` as stored
    pub fn progress(&self) -> (usize, usize) {
        let finished = self.units.iter().filter(|unit| unit.is_done()).count();
        (finished, self.units.len())
    }

    /// Check the snapshot against `records` and build the registry
    pub fn into_registry(self, records: &RecordSet) -> Result<BatchRegistry> {
        if self.version != SNAPSHOT_VERSION {
            return Err(BatchError::Persistence(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        if self.record_count != records.len() {
            return Err(BatchError::Persistence(format!(
                "snapshot was created for {} records but {} were supplied",
                self.record_count,
                records.len()
            )));
        }
        for unit in &self.units {
            if unit.end() > records.len() {
                return Err(BatchError::Persistence(format!(
                    "batch {} is outside the {} records",
                    unit.label(),
                    records.len()
                )));
            }
            unit.check_consistency().map_err(BatchError::Persistence)?;
            let missing = records.missing_summaries(unit.start(), unit.end());
            if unit.is_done() && missing > 0 {
                return Err(BatchError::Persistence(format!(
                    "batch {} is done but {} of its records have no summary",
                    unit.label(),
                    missing
                )));
            }
        }

        Ok(BatchRegistry::from_parts(
            BatchLayout::new(self.root),
            self.record_count,
            self.units,
        ))
    }
}

/// Write `snapshot` to `path` through a temporary sibling file
pub async fn save(snapshot: &RegistrySnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(&temp_path).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&temp_path, path).await?;

    info!(path = %path.display(), units = snapshot.units.len(), "Saved batch registry");
    Ok(())
}

/// Read a snapshot without binding it to records
pub async fn read_snapshot(path: &Path) -> Result<RegistrySnapshot> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        BatchError::Persistence(format!("cannot read {}: {}", path.display(), e))
    })?;
    let snapshot: RegistrySnapshot = serde_json::from_slice(&content).map_err(|e| {
        BatchError::Persistence(format!("corrupt snapshot {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), units = snapshot.units.len(), "Read batch registry");
    Ok(snapshot)
}

/// Read the snapshot at `path` and bind it to `records`
pub async fn load(path: &Path, records: &RecordSet) -> Result<BatchRegistry> {
    read_snapshot(path).await?.into_registry(records)
}
