//! Remote batch providers
//!
//! The batch lifecycle only talks to a provider through [`BatchApi`]: upload a
//! request file, create a job for it, retrieve the job, download its output.

pub mod error;
pub mod groq;

pub use error::ProviderError;
pub use groq::{GroqBatchClient, GroqConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File purpose used for batch input files
pub const BATCH_FILE_PURPOSE: &str = "batch";

/// Uploaded file descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    /// File ID
    pub id: String,
    /// Object type
    #[serde(default)]
    pub object: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Original file name
    #[serde(default)]
    pub filename: Option<String>,
    /// Declared purpose
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Batch job creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub input_file_id: String,
    pub endpoint: String,
    pub completion_window: String,
}

/// Remote batch job status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchJobStatus {
    /// Batch is being validated
    Validating,
    /// Batch validation failed
    Failed,
    /// Batch is being processed
    InProgress,
    /// Batch is being finalized
    Finalizing,
    /// Batch processing completed
    Completed,
    /// Batch has expired
    Expired,
    /// Batch is being cancelled
    Cancelling,
    /// Batch has been cancelled
    Cancelled,
    /// Anything the provider reports that we do not know about
    #[serde(other)]
    Unknown,
}

impl BatchJobStatus {
    /// Whether the job has stopped without producing a usable output
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            BatchJobStatus::Failed | BatchJobStatus::Expired | BatchJobStatus::Cancelled
        )
    }
}

/// Request counts for a batch job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequestCounts {
    /// Total requests in batch
    pub total: u32,
    /// Completed requests
    pub completed: u32,
    /// Failed requests
    pub failed: u32,
}

/// Remote batch job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    /// Batch ID
    pub id: String,
    /// Batch status
    pub status: BatchJobStatus,
    /// Input file ID
    #[serde(default)]
    pub input_file_id: Option<String>,
    /// Output file ID (for completed batches)
    #[serde(default)]
    pub output_file_id: Option<String>,
    /// Error file ID (for failed requests)
    #[serde(default)]
    pub error_file_id: Option<String>,
    /// Request counts
    #[serde(default)]
    pub request_counts: Option<BatchRequestCounts>,
}

/// Operations of an OpenAI-compatible batch API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchApi: Send + Sync {
    /// Upload a local file for the given purpose
    async fn upload_file(&self, path: &Path, purpose: &str) -> Result<FileObject, ProviderError>;

    /// Create a batch job over an uploaded input file
    async fn create_batch(&self, request: CreateBatchRequest) -> Result<BatchJob, ProviderError>;

    /// Retrieve the current state of a batch job
    async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchJob, ProviderError>;

    /// Download a file's content to `dest`, returning the number of bytes written
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, ProviderError>;
}
