//! Batch registry and its bulk passes

use super::layout::BatchLayout;
use super::partition::partition;
use super::snapshot::{self, RegistrySnapshot};
use super::unit::BatchUnit;
use crate::config::BatchSettings;
use crate::core::providers::BatchApi;
use crate::core::records::RecordSet;
use crate::utils::error::{BatchError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// A unit that failed during a pass run with `continue_on_error`
#[derive(Debug)]
pub struct UnitFailure {
    /// Unit label, `<start>_<end>`
    pub unit: String,
    pub error: BatchError,
}

/// Outcome of a submission pass
#[derive(Debug, Default)]
pub struct RunReport {
    /// Units rendered, uploaded and submitted in this pass
    pub submitted: usize,
    /// Units left alone because they already had a job
    pub skipped: usize,
    pub failures: Vec<UnitFailure>,
}

/// Outcome of a fetch pass
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Units done after the pass
    pub finished: usize,
    /// Units in the registry
    pub total: usize,
    /// Units that became done during this pass
    pub applied: usize,
    pub failures: Vec<UnitFailure>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.finished == self.total
    }
}

/// Ordered collection of every batch unit of one run.
///
/// The registry never owns the records: passes borrow the caller's
/// [`RecordSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRegistry {
    layout: BatchLayout,
    record_count: usize,
    units: Vec<BatchUnit>,
}

impl BatchRegistry {
    pub fn new(layout: BatchLayout) -> Self {
        Self {
            layout,
            record_count: 0,
            units: Vec::new(),
        }
    }

    pub(crate) fn from_parts(layout: BatchLayout, record_count: usize, units: Vec<BatchUnit>) -> Self {
        Self {
            layout,
            record_count,
            units,
        }
    }

    pub fn layout(&self) -> &BatchLayout {
        &self.layout
    }

    /// Number of records the units were partitioned over
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn units(&self) -> &[BatchUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Partition the records into units and append them. Existing units are
    /// kept, so calling this twice doubles the registry.
    pub fn create(&mut self, records: &RecordSet, chunk_size: usize) -> Result<usize> {
        let units = partition(records.len(), chunk_size)?;
        self.layout.ensure_dirs()?;

        let created = units.len();
        self.units.extend(units);
        self.record_count = records.len();
        info!("Created {} batches", created);
        Ok(created)
    }

    /// Render, upload and submit every unit, in order. Units that were
    /// submitted before are submitted again.
    pub async fn run(
        &mut self,
        api: &dyn BatchApi,
        records: &RecordSet,
        settings: &BatchSettings,
    ) -> Result<RunReport> {
        self.submit_units(api, records, settings, false).await
    }

    /// Like [`run`](Self::run), but leaves units that already have a job
    pub async fn submit_pending(
        &mut self,
        api: &dyn BatchApi,
        records: &RecordSet,
        settings: &BatchSettings,
    ) -> Result<RunReport> {
        self.submit_units(api, records, settings, true).await
    }

    async fn submit_units(
        &mut self,
        api: &dyn BatchApi,
        records: &RecordSet,
        settings: &BatchSettings,
        skip_submitted: bool,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();
        let layout = &self.layout;

        for unit in self.units.iter_mut() {
            if skip_submitted && unit.batch_id().is_some() {
                debug!(batch = %unit.label(), "Skipping submitted batch");
                report.skipped += 1;
                continue;
            }

            let outcome = async {
                unit.render(layout, records, settings).await?;
                unit.upload(api, layout).await?;
                unit.submit(api, settings).await?;
                Ok::<_, BatchError>(())
            }
            .await;

            match outcome {
                Ok(()) => report.submitted += 1,
                Err(error) if settings.continue_on_error => {
                    warn!(batch = %unit.label(), error = %error, "Batch submission failed, continuing");
                    report.failures.push(UnitFailure {
                        unit: unit.label(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        info!("Submitted {} batches", report.submitted);
        Ok(report)
    }

    /// Poll every unit that is not done, and download and apply the results
    /// of the ones that have completed. Never waits on incomplete units.
    pub async fn fetch(
        &mut self,
        api: &dyn BatchApi,
        records: &mut RecordSet,
        settings: &BatchSettings,
    ) -> Result<FetchReport> {
        let mut report = FetchReport {
            total: self.units.len(),
            ..Default::default()
        };
        let layout = &self.layout;

        for unit in self.units.iter_mut() {
            if unit.is_done() {
                continue;
            }
            if unit.batch_id().is_none() {
                debug!(batch = %unit.label(), "Batch not submitted yet");
                continue;
            }

            let outcome = async {
                if unit.poll(api).await? {
                    unit.fetch(api, layout).await?;
                    unit.apply(layout, records).await?;
                }
                Ok::<_, BatchError>(())
            }
            .await;

            match outcome {
                Ok(()) if unit.is_done() => report.applied += 1,
                Ok(()) => {}
                Err(error) if settings.continue_on_error => {
                    warn!(batch = %unit.label(), error = %error, "Batch fetch failed, continuing");
                    report.failures.push(UnitFailure {
                        unit: unit.label(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        report.finished = self.units.iter().filter(|unit| unit.is_done()).count();
        info!("Finished {} of {} batches", report.finished, report.total);
        Ok(report)
    }

    /// `(finished, total)` without touching the network
    pub fn progress(&self) -> (usize, usize) {
        let finished = self.units.iter().filter(|unit| unit.is_done()).count();
        (finished, self.units.len())
    }

    /// Write the registry snapshot to `path`
    pub async fn save(&self, path: &Path) -> Result<()> {
        snapshot::save(&RegistrySnapshot::of(self), path).await
    }

    /// Restore a registry from `path`, bound to the caller's `records`
    pub async fn load(path: &Path, records: &RecordSet) -> Result<Self> {
        snapshot::load(path, records).await
    }
}
