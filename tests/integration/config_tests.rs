//! Configuration loading tests

#[cfg(test)]
mod tests {
    use litebatch::config::{Config, LogFormat, Profile};
    use litebatch::{BatchError, BatchLayout};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;

    fn example_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("config/litebatch.yaml.example")
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let content = std::fs::read_to_string(example_path()).unwrap();
        let config = Config::from_yaml(&content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.batch.model, "openai/gpt-oss-20b");
        assert_eq!(config.batch.chunk_size, 1000);
        assert_eq!(config.batch.completion_window, "24h");
        assert_eq!(config.storage.profile, Profile::Lite);
        assert_eq!(config.storage.state_file, PathBuf::from("batches.json"));
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.batch.system_prompt, Config::default().batch.system_prompt);
    }

    #[tokio::test]
    async fn test_invalid_completion_window_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "batch:\n  completion_window: tomorrow").unwrap();

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, BatchError::Config(msg) if msg.contains("completion_window")));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let err = Config::from_file("/nonexistent/litebatch.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::Config(_)));
    }

    #[test]
    fn test_profile_selects_folder_tree() {
        let config = Config::from_yaml("storage:\n  base_dir: /data\n  profile: full\n").unwrap();
        let layout = BatchLayout::for_profile(&config.storage.base_dir, config.storage.profile);
        assert_eq!(
            layout.request_path("0_1000.jsonl"),
            PathBuf::from("/data/full/batches/0_1000.jsonl")
        );
    }

    #[test]
    fn test_reasoning_effort_can_be_disabled() {
        let config = Config::from_yaml("batch:\n  reasoning_effort: null\n").unwrap();
        assert!(config.batch.reasoning_effort.is_none());
        assert!(config.validate().is_ok());
    }
}
