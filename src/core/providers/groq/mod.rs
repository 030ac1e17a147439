//! Groq Provider
//!
//! Groq exposes an OpenAI-compatible batch API: JSONL input files are uploaded
//! through `/files`, jobs are created and inspected through `/batches`, and
//! results come back as another file.

mod client;
mod config;


// Re-export main types for external use
pub use client::{GroqBatchClient, create_upload_form};
pub use config::GroqConfig;
