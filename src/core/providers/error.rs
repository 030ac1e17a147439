//! Provider error types
//!
//! Transport and API failures reported by a remote batch provider.

use thiserror::Error;

/// Errors returned by a batch provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parsing error: {0}")]
    Parsing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Map a non-success HTTP response to an error
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(if body.is_empty() {
                "Invalid API key".to_string()
            } else {
                body
            }),
            404 => ProviderError::NotFound(body),
            429 => ProviderError::RateLimit(body),
            _ => ProviderError::Api {
                status,
                message: body,
            },
        }
    }

    /// Whether a later attempt could succeed. Nothing in this crate retries on
    /// its own; callers use this to decide whether re-running a pass is worth it.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimit(_) | ProviderError::Network(_) => true,
            ProviderError::Api { status, .. } => matches!(*status, 500..=599),
            ProviderError::Authentication(_)
            | ProviderError::NotFound(_)
            | ProviderError::Parsing(_)
            | ProviderError::Configuration(_)
            | ProviderError::Io(_) => false,
        }
    }

    /// Short machine-readable error type
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::Authentication(_) => "authentication_error",
            ProviderError::RateLimit(_) => "rate_limit_error",
            ProviderError::NotFound(_) => "not_found_error",
            ProviderError::Api { .. } => "api_error",
            ProviderError::Network(_) => "network_error",
            ProviderError::Parsing(_) => "parsing_error",
            ProviderError::Configuration(_) => "configuration_error",
            ProviderError::Io(_) => "io_error",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Parsing(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}
