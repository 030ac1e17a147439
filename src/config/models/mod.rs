//! Configuration data models
//!
//! This module defines all configuration structures used by the batch driver.

pub mod batch;
pub mod logging;
pub mod storage;

// Re-export all configuration types
pub use batch::*;
pub use logging::*;
pub use storage::*;

/// Default model serving the batch requests
pub fn default_model() -> String {
    "openai/gpt-oss-20b".to_string()
}

/// Default number of records per batch
pub fn default_chunk_size() -> usize {
    1_000
}

/// Default remote job deadline
pub fn default_completion_window() -> String {
    "24h".to_string()
}

/// Default endpoint each request line targets
pub fn default_endpoint() -> String {
    "/v1/chat/completions".to_string()
}

/// Default reasoning effort
pub fn default_reasoning_effort() -> Option<String> {
    Some("low".to_string())
}

/// Default instruction sent with every record
pub fn default_system_prompt() -> String {
    "Create a concise description of a product. Respond only in this format. Do not\n\
include part numbers.\n\
Title: Rewritten short precise title\n\
Category: eg Electronics\n\
Brand: Brand name\n\
Description: 1 sentence description of the product\n\
Details: 1 sentence of features "
        .to_string()
}

/// Default snapshot file
pub fn default_state_file() -> std::path::PathBuf {
    std::path::PathBuf::from("batches.json")
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}
