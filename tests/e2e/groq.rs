//! E2E tests for the Groq batch API
//!
//! These tests make real API calls and require GROQ_API_KEY.
//! Run with: GROQ_API_KEY=xxx cargo test -- --ignored groq

#[cfg(test)]
mod tests {
    use crate::skip_without_env;
    use litebatch::core::providers::{BATCH_FILE_PURPOSE, BatchApi};
    use litebatch::{GroqBatchClient, GroqConfig, ProviderError};

    /// Retrieving an unknown batch is reported as not found
    #[tokio::test]
    #[ignore]
    async fn test_groq_unknown_batch() {
        skip_without_env!("GROQ_API_KEY");
        let client = GroqBatchClient::new(GroqConfig::default()).expect("Failed to create client");

        let result = client.retrieve_batch("batch_does_not_exist").await;
        assert!(
            matches!(result, Err(ProviderError::NotFound(_)) | Err(ProviderError::Api { .. })),
            "unexpected result: {:?}",
            result
        );
    }

    /// Uploading a one-line batch file returns a file id
    #[tokio::test]
    #[ignore]
    async fn test_groq_upload_batch_file() {
        skip_without_env!("GROQ_API_KEY");
        let client = GroqBatchClient::new(GroqConfig::default()).expect("Failed to create client");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0_1.jsonl");
        let line = serde_json::json!({
            "custom_id": "0",
            "method": "POST",
            "url": "/v1/chat/completions",
            "body": {
                "model": "openai/gpt-oss-20b",
                "messages": [{"role": "user", "content": "Say hello."}]
            }
        });
        std::fs::write(&path, format!("{}\n", line)).unwrap();

        let file = client
            .upload_file(&path, BATCH_FILE_PURPOSE)
            .await
            .expect("upload failed");
        assert!(!file.id.is_empty());
    }
}
