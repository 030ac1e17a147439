//! Groq batch client
//!
//! Implements [`BatchApi`] against Groq's OpenAI-compatible files and batches
//! endpoints.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::config::GroqConfig;
use crate::core::providers::{
    BatchApi, BatchJob, CreateBatchRequest, FileObject, ProviderError,
};

/// HTTP client for the Groq files and batches API
#[derive(Debug, Clone)]
pub struct GroqBatchClient {
    config: GroqConfig,
    http: reqwest::Client,
    api_key: String,
}

impl GroqBatchClient {
    /// Create a new client from configuration
    pub fn new(config: GroqConfig) -> Result<Self, ProviderError> {
        config.validate().map_err(ProviderError::Configuration)?;

        let api_key = config.get_api_key().ok_or_else(|| {
            ProviderError::Configuration("Groq API key is required".to_string())
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http,
            api_key,
        })
    }

    /// Create client with API key only
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new(GroqConfig {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.get_api_base(), path)
    }

    /// Turn a non-success response into an error, pass others through
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::from_status(status.as_u16(), body))
    }
}

/// Build the multipart form for a batch input file upload
pub fn create_upload_form(
    file_name: String,
    contents: Vec<u8>,
    purpose: &str,
) -> Result<multipart::Form, ProviderError> {
    let file_part = multipart::Part::bytes(contents)
        .file_name(file_name)
        .mime_str("application/jsonl")
        .map_err(|e| ProviderError::Configuration(format!("Invalid MIME type: {}", e)))?;

    Ok(multipart::Form::new()
        .text("purpose", purpose.to_string())
        .part("file", file_part))
}

#[async_trait]
impl BatchApi for GroqBatchClient {
    async fn upload_file(&self, path: &Path, purpose: &str) -> Result<FileObject, ProviderError> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "batch.jsonl".to_string());

        debug!(file = %path.display(), bytes = contents.len(), "Uploading batch file");

        let form = create_upload_form(file_name, contents, purpose)?;
        let response = self
            .http
            .post(self.url("/files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_batch(&self, request: CreateBatchRequest) -> Result<BatchJob, ProviderError> {
        debug!(input_file_id = %request.input_file_id, "Creating batch job");

        let response = self
            .http
            .post(self.url("/batches"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchJob, ProviderError> {
        let response = self
            .http
            .get(self.url(&format!("/batches/{}", batch_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, ProviderError> {
        let response = self
            .http
            .get(self.url(&format!("/files/{}/content", file_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(file_id, bytes = written, dest = %dest.display(), "Downloaded file");
        Ok(written)
    }
}
