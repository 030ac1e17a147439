//! Batch wire types
//!
//! One [`BatchItem`] is one line of a request file; one [`BatchResult`] is one
//! line of the output file the provider produces for it.

use crate::config::BatchSettings;
use crate::core::records::Record;
use serde::{Deserialize, Serialize};

/// HTTP method every batch line uses
pub const BATCH_METHOD: &str = "POST";

/// Chat message inside a request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

/// Individual item in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Custom ID for this request; the provider requires a string
    pub custom_id: String,
    /// HTTP method (always POST)
    pub method: String,
    /// API endpoint
    pub url: String,
    /// Request body
    pub body: ChatCompletionBody,
}

impl BatchItem {
    /// Build the request line for one record
    pub fn for_record(record: &Record, settings: &BatchSettings) -> Self {
        Self {
            custom_id: record.id.to_string(),
            method: BATCH_METHOD.to_string(),
            url: settings.endpoint.clone(),
            body: ChatCompletionBody {
                model: settings.model.clone(),
                messages: vec![
                    ChatMessage::system(settings.system_prompt.as_str()),
                    ChatMessage::user(record.full.as_str()),
                ],
                reasoning_effort: settings.reasoning_effort.clone(),
            },
        }
    }
}

/// Message carrying the generated text
#[derive(Debug, Clone, Deserialize)]
pub struct ResultMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// One completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ResultChoice {
    pub message: ResultMessage,
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ResultBody {
    #[serde(default)]
    pub choices: Vec<ResultChoice>,
}

/// HTTP response for batch item
#[derive(Debug, Clone, Deserialize)]
pub struct BatchHttpResponse {
    /// HTTP status code
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Response body
    pub body: ResultBody,
}

/// Individual batch result
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResult {
    /// Custom ID from request
    pub custom_id: String,
    /// HTTP response
    #[serde(default)]
    pub response: Option<BatchHttpResponse>,
    /// Error information
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl BatchResult {
    /// Parse one output line into `(record id, generated text)`
    pub fn parse_line(line: &str) -> Result<(u64, String), String> {
        let result: BatchResult =
            serde_json::from_str(line).map_err(|e| format!("invalid JSON: {}", e))?;
        result.into_summary()
    }

    /// Extract `(record id, generated text)`
    pub fn into_summary(self) -> Result<(u64, String), String> {
        let id = self
            .custom_id
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("custom_id '{}' is not a record id", self.custom_id))?;

        let response = match self.response {
            Some(response) => response,
            None => {
                let detail = self
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no response".to_string());
                return Err(format!("request {} has no response: {}", id, detail));
            }
        };

        let content = response
            .body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| format!("request {} has no message content", id))?;

        Ok((id, content))
    }
}
