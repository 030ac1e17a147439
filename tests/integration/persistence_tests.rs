//! Snapshot persistence tests
//!
//! A registry is saved in one "session" and restored in the next against
//! records re-read from disk, the way the command-line driver works.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::FakeBatchApi;
    use crate::common::fixtures::{product_records, settings, write_records};
    use litebatch::cli::fetch_source;
    use litebatch::config::Profile;
    use litebatch::core::batch::read_snapshot;
    use litebatch::{BatchError, BatchLayout, BatchRegistry, RecordSet};
    use std::path::Path;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resume_fetch_in_a_new_session() {
        let temp = TempDir::new().unwrap();
        let records_path = temp.path().join("items.jsonl");
        let state_file = temp.path().join("batches.json");
        let api = FakeBatchApi::new();

        // First session: create and submit.
        {
            let records = product_records(12);
            write_records(&records, &records_path).await;
            let mut registry =
                BatchRegistry::new(BatchLayout::for_profile(temp.path(), Profile::Full));
            registry.create(&records, 5).unwrap();
            registry.run(&api, &records, &settings(false)).await.unwrap();
            assert_ok!(registry.save(&state_file).await);
        }

        // The provider finishes two of the three jobs in between.
        let snapshot = read_snapshot(&state_file).await.unwrap();
        for unit in &snapshot.units[..2] {
            api.complete(unit.batch_id().unwrap());
        }

        // Second session: restore and fetch.
        let mut records = RecordSet::read_jsonl(&records_path).await.unwrap();
        let mut registry = assert_ok!(BatchRegistry::load(&state_file, &records).await);
        assert_eq!(registry.layout().root(), temp.path().join("full"));

        let report = registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();
        assert_eq!((report.finished, report.total), (2, 3));
        registry.save(&state_file).await.unwrap();
        records.write_jsonl(&records_path).await.unwrap();

        // Third session sees the progress and the summaries.
        let records = RecordSet::read_jsonl(&records_path).await.unwrap();
        let registry = BatchRegistry::load(&state_file, &records).await.unwrap();
        assert_eq!(registry.progress(), (2, 3));
        assert_eq!(
            records.iter().filter(|record| record.summary.is_some()).count(),
            10
        );
        assert!(
            registry
                .layout()
                .output_path("5_10.jsonl")
                .is_file()
        );
    }

    /// One fetch session writing to `out`: read, load, fetch, save, write
    async fn fetch_pass(
        api: &FakeBatchApi,
        records_path: &Path,
        out: &Path,
        state_file: &Path,
    ) -> (usize, usize) {
        let mut records = RecordSet::read_jsonl(fetch_source(records_path, out))
            .await
            .unwrap();
        let mut registry = BatchRegistry::load(state_file, &records).await.unwrap();
        let report = registry
            .fetch(api, &mut records, &settings(false))
            .await
            .unwrap();
        registry.save(state_file).await.unwrap();
        records.write_jsonl(out).await.unwrap();
        (report.finished, report.total)
    }

    #[tokio::test]
    async fn test_fetch_passes_into_separate_output_file() {
        let temp = TempDir::new().unwrap();
        let records_path = temp.path().join("items.jsonl");
        let out_path = temp.path().join("done.jsonl");
        let state_file = temp.path().join("batches.json");
        let api = FakeBatchApi::new();

        let records = product_records(4);
        write_records(&records, &records_path).await;
        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&records, 2).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();
        registry.save(&state_file).await.unwrap();
        let batch_ids: Vec<String> = registry
            .units()
            .iter()
            .map(|unit| unit.batch_id().unwrap().to_string())
            .collect();

        api.complete(&batch_ids[0]);
        assert_eq!(fetch_pass(&api, &records_path, &out_path, &state_file).await, (1, 2));
        api.complete(&batch_ids[1]);
        assert_eq!(fetch_pass(&api, &records_path, &out_path, &state_file).await, (2, 2));

        let done = RecordSet::read_jsonl(&out_path).await.unwrap();
        assert_eq!(
            done.iter().filter(|record| record.summary.is_some()).count(),
            4
        );
        let original = RecordSet::read_jsonl(&records_path).await.unwrap();
        assert!(original.iter().all(|record| record.summary.is_none()));
    }

    #[tokio::test]
    async fn test_load_rejects_done_batches_missing_summaries() {
        let temp = TempDir::new().unwrap();
        let state_file = temp.path().join("batches.json");
        let api = FakeBatchApi::new();
        let mut records = product_records(4);

        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&records, 2).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();
        api.complete(registry.units()[0].batch_id().unwrap());
        registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();
        registry.save(&state_file).await.unwrap();

        let err = BatchRegistry::load(&state_file, &product_records(4))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::Persistence(msg) if msg.contains("summary")));
    }

    #[tokio::test]
    async fn test_save_load_preserves_every_unit_field() {
        let temp = TempDir::new().unwrap();
        let state_file = temp.path().join("batches.json");
        let api = FakeBatchApi::new();
        let mut records = product_records(9);

        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&records, 3).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();
        api.complete(registry.units()[1].batch_id().unwrap());
        registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();

        registry.save(&state_file).await.unwrap();
        let loaded = BatchRegistry::load(&state_file, &records).await.unwrap();

        assert_eq!(loaded.units(), registry.units());
        assert_eq!(loaded.record_count(), 9);
        assert!(loaded.units()[1].is_done());
        assert!(loaded.units()[1].output_file_id().is_some());
    }

    #[tokio::test]
    async fn test_snapshot_holds_no_record_payload() {
        let temp = TempDir::new().unwrap();
        let state_file = temp.path().join("batches.json");
        let records = product_records(4);

        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&records, 2).unwrap();
        registry.save(&state_file).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&state_file).unwrap()).unwrap();
        let keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        assert!(!keys.iter().any(|key| key.contains("record") && key != "record_count"));
        assert!(!raw.to_string().contains("sturdy appliance"));
        assert_eq!(raw["units"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_against_different_records() {
        let temp = TempDir::new().unwrap();
        let state_file = temp.path().join("batches.json");

        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&product_records(10), 5).unwrap();
        registry.save(&state_file).await.unwrap();

        let err = BatchRegistry::load(&state_file, &product_records(8))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let state_file = temp.path().join("batches.json");
        let records = product_records(6);

        let mut registry = BatchRegistry::new(BatchLayout::new(temp.path().join("lite")));
        registry.create(&records, 3).unwrap();
        registry.save(&state_file).await.unwrap();
        registry.create(&records, 3).unwrap();
        registry.save(&state_file).await.unwrap();

        let snapshot = read_snapshot(&state_file).await.unwrap();
        assert_eq!(snapshot.units.len(), 4);
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
