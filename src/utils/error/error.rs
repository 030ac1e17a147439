//! Error handling for the batch driver
//!
//! This module defines all error types used throughout the crate.

use crate::core::providers::ProviderError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the batch driver
pub type Result<T> = std::result::Result<T, BatchError>;

/// Main error type for the batch driver
#[derive(Error, Debug)]
pub enum BatchError {
    /// Uploading a rendered request file failed
    #[error("Upload failed for batch {unit}: {source}")]
    RemoteUpload {
        unit: String,
        #[source]
        source: ProviderError,
    },

    /// Creating the remote batch job failed
    #[error("Batch submission failed for batch {unit}: {source}")]
    RemoteSubmit {
        unit: String,
        #[source]
        source: ProviderError,
    },

    /// Retrieving the remote batch status failed
    #[error("Status check failed for batch {unit}: {source}")]
    RemotePoll {
        unit: String,
        #[source]
        source: ProviderError,
    },

    /// Downloading the remote output file failed
    #[error("Download failed for batch {unit}: {source}")]
    RemoteDownload {
        unit: String,
        #[source]
        source: ProviderError,
    },

    /// A downloaded result line could not be understood
    #[error("Malformed result in {} line {line}: {reason}", path.display())]
    MalformedResult {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A result file left records of its batch without a summary
    #[error("Batch {unit} finished with {missing} record(s) still missing a summary")]
    IncompleteResults { unit: String, missing: usize },

    /// Snapshot file missing, corrupt or not matching the records
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Record failed schema validation
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Operation attempted out of lifecycle order
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BatchError {
    /// Whether the error came from the remote provider
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            BatchError::RemoteUpload { .. }
                | BatchError::RemoteSubmit { .. }
                | BatchError::RemotePoll { .. }
                | BatchError::RemoteDownload { .. }
        )
    }

    /// The provider error behind a remote failure, if any
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            BatchError::RemoteUpload { source, .. }
            | BatchError::RemoteSubmit { source, .. }
            | BatchError::RemotePoll { source, .. }
            | BatchError::RemoteDownload { source, .. } => Some(source),
            _ => None,
        }
    }
}
