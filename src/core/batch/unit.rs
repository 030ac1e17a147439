//! A single batch unit and its lifecycle steps

use super::layout::BatchLayout;
use super::types::{BatchItem, BatchResult};
use crate::config::BatchSettings;
use crate::core::providers::{
    BATCH_FILE_PURPOSE, BatchApi, BatchJobStatus, CreateBatchRequest, ProviderError,
};
use crate::core::records::RecordSet;
use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where a unit stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Nothing uploaded yet
    Pending,
    /// Input file uploaded, no job created
    Uploaded,
    /// Remote job created and not known to be complete
    Submitted,
    /// Remote job complete, results not applied yet
    Completed,
    /// Results applied to the records
    Done,
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitState::Pending => "pending",
            UnitState::Uploaded => "uploaded",
            UnitState::Submitted => "submitted",
            UnitState::Completed => "completed",
            UnitState::Done => "done",
        };
        f.write_str(name)
    }
}

/// One contiguous `[start, end)` slice of the records, submitted as one
/// remote batch job.
///
/// Remote ids are only ever set in order: `file_id`, then `batch_id`, then
/// `output_file_id`. Uploading or submitting again clears whatever came after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUnit {
    start: usize,
    end: usize,
    #[serde(default)]
    file_id: Option<String>,
    #[serde(default)]
    batch_id: Option<String>,
    #[serde(default)]
    output_file_id: Option<String>,
    #[serde(default)]
    done: bool,
}

impl BatchUnit {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            file_id: None,
            batch_id: None,
            output_file_id: None,
            done: false,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// `<start>_<end>`, used in logs and errors
    pub fn label(&self) -> String {
        format!("{}_{}", self.start, self.end)
    }

    pub fn filename(&self) -> String {
        format!("{}.jsonl", self.label())
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn batch_id(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }

    pub fn output_file_id(&self) -> Option<&str> {
        self.output_file_id.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn state(&self) -> UnitState {
        if self.done {
            UnitState::Done
        } else if self.output_file_id.is_some() {
            UnitState::Completed
        } else if self.batch_id.is_some() {
            UnitState::Submitted
        } else if self.file_id.is_some() {
            UnitState::Uploaded
        } else {
            UnitState::Pending
        }
    }

    /// Check the stored fields are internally consistent
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        if self.start >= self.end {
            return Err(format!("batch {} has an empty range", self.label()));
        }
        if self.batch_id.is_some() && self.file_id.is_none() {
            return Err(format!("batch {} has a job but no input file", self.label()));
        }
        if self.output_file_id.is_some() && self.batch_id.is_none() {
            return Err(format!("batch {} has an output but no job", self.label()));
        }
        if self.done && self.output_file_id.is_none() {
            return Err(format!("batch {} is done without an output file", self.label()));
        }
        Ok(())
    }

    /// Write one request line per record in range to the unit's request file
    pub async fn render(
        &self,
        layout: &BatchLayout,
        records: &RecordSet,
        settings: &BatchSettings,
    ) -> Result<PathBuf> {
        let slice = records.range(self.start, self.end).ok_or_else(|| {
            BatchError::InvalidState(format!(
                "batch {} is outside the {} records",
                self.label(),
                records.len()
            ))
        })?;

        let mut buffer = Vec::new();
        for record in slice {
            serde_json::to_writer(&mut buffer, &BatchItem::for_record(record, settings))?;
            buffer.push(b'\n');
        }

        let path = layout.request_path(&self.filename());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &buffer).await?;
        debug!(batch = %self.label(), lines = slice.len(), path = %path.display(), "Rendered batch file");
        Ok(path)
    }

    /// Upload the rendered request file and record its file id
    pub async fn upload(&mut self, api: &dyn BatchApi, layout: &BatchLayout) -> Result<&str> {
        let path = layout.request_path(&self.filename());
        let file = api
            .upload_file(&path, BATCH_FILE_PURPOSE)
            .await
            .map_err(|source| BatchError::RemoteUpload {
                unit: self.label(),
                source,
            })?;

        if file.id.trim().is_empty() {
            return Err(BatchError::RemoteUpload {
                unit: self.label(),
                source: ProviderError::Parsing("upload returned an empty file id".to_string()),
            });
        }

        debug!(batch = %self.label(), file_id = %file.id, "Uploaded batch file");
        self.batch_id = None;
        self.output_file_id = None;
        self.done = false;
        Ok(self.file_id.insert(file.id).as_str())
    }

    /// Create the remote job for the uploaded file and record its batch id
    pub async fn submit(&mut self, api: &dyn BatchApi, settings: &BatchSettings) -> Result<&str> {
        let input_file_id = self.file_id.clone().ok_or_else(|| {
            BatchError::InvalidState(format!("batch {} has not been uploaded", self.label()))
        })?;

        let request = CreateBatchRequest {
            input_file_id,
            endpoint: settings.endpoint.clone(),
            completion_window: settings.completion_window.clone(),
        };
        let job = api
            .create_batch(request)
            .await
            .map_err(|source| BatchError::RemoteSubmit {
                unit: self.label(),
                source,
            })?;

        if job.id.trim().is_empty() {
            return Err(BatchError::RemoteSubmit {
                unit: self.label(),
                source: ProviderError::Parsing("batch creation returned an empty id".to_string()),
            });
        }

        debug!(batch = %self.label(), batch_id = %job.id, "Created batch job");
        self.output_file_id = None;
        self.done = false;
        Ok(self.batch_id.insert(job.id).as_str())
    }

    /// Check the remote job. Returns true once it has completed, storing the
    /// output file id.
    pub async fn poll(&mut self, api: &dyn BatchApi) -> Result<bool> {
        let batch_id = self.batch_id.as_deref().ok_or_else(|| {
            BatchError::InvalidState(format!("batch {} has not been submitted", self.label()))
        })?;

        let job = api
            .retrieve_batch(batch_id)
            .await
            .map_err(|source| BatchError::RemotePoll {
                unit: self.label(),
                source,
            })?;

        match job.status {
            BatchJobStatus::Completed => {
                let output = job
                    .output_file_id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| BatchError::RemotePoll {
                        unit: self.label(),
                        source: ProviderError::Parsing(
                            "completed batch has no output file".to_string(),
                        ),
                    })?;
                debug!(batch = %self.label(), output_file_id = %output, "Batch completed");
                self.output_file_id = Some(output);
                Ok(true)
            }
            status if status.is_terminal_failure() => {
                warn!(batch = %self.label(), batch_id = %job.id, status = ?status, "Batch job ended without output");
                Ok(false)
            }
            status => {
                debug!(batch = %self.label(), status = ?status, "Batch not complete");
                Ok(false)
            }
        }
    }

    /// Download the output file into the layout's output folder
    pub async fn fetch(&self, api: &dyn BatchApi, layout: &BatchLayout) -> Result<PathBuf> {
        let output_file_id = self.output_file_id.as_deref().ok_or_else(|| {
            BatchError::InvalidState(format!("batch {} has no output yet", self.label()))
        })?;

        let path = layout.output_path(&self.filename());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = api
            .download_file(output_file_id, &path)
            .await
            .map_err(|source| BatchError::RemoteDownload {
                unit: self.label(),
                source,
            })?;
        debug!(batch = %self.label(), bytes, path = %path.display(), "Downloaded batch output");
        Ok(path)
    }

    /// Write the downloaded summaries into the records. Not atomic: a bad line
    /// leaves earlier lines applied and the unit not done.
    pub async fn apply(&mut self, layout: &BatchLayout, records: &mut RecordSet) -> Result<usize> {
        if self.output_file_id.is_none() {
            return Err(BatchError::InvalidState(format!(
                "batch {} has no output yet",
                self.label()
            )));
        }

        let path = layout.output_path(&self.filename());
        let content = tokio::fs::read_to_string(&path).await?;

        let mut applied = 0;
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: String| BatchError::MalformedResult {
                path: path.clone(),
                line: index + 1,
                reason,
            };

            let (id, summary) = BatchResult::parse_line(line).map_err(malformed)?;
            if !records.set_summary(id, summary) {
                return Err(malformed(format!("unknown record id {}", id)));
            }
            applied += 1;
        }

        let missing = records.missing_summaries(self.start, self.end);
        if missing > 0 {
            return Err(BatchError::IncompleteResults {
                unit: self.label(),
                missing,
            });
        }

        self.done = true;
        debug!(batch = %self.label(), applied, "Applied batch results");
        Ok(applied)
    }
}
