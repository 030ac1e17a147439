//! Batch lifecycle tests against the in-memory provider

#[cfg(test)]
mod tests {
    use crate::common::FakeBatchApi;
    use crate::common::fixtures::{product_records, settings};
    use crate::{assert_err, assert_ok};
    use litebatch::core::providers::BatchJobStatus;
    use litebatch::{BatchError, BatchLayout, BatchRegistry, UnitState};
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn registry(temp: &TempDir) -> BatchRegistry {
        BatchRegistry::new(BatchLayout::new(temp.path().join("lite")))
    }

    fn batch_id(registry: &BatchRegistry, index: usize) -> String {
        registry.units()[index]
            .batch_id()
            .expect("unit was submitted")
            .to_string()
    }

    #[tokio::test]
    async fn test_lifecycle_with_one_completed_batch() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let mut records = product_records(2500);
        let mut registry = registry(&temp);

        assert_eq!(assert_ok!(registry.create(&records, 1000)), 3);
        let ranges: Vec<_> = registry
            .units()
            .iter()
            .map(|unit| (unit.start(), unit.end()))
            .collect();
        assert_eq!(ranges, vec![(0, 1000), (1000, 2000), (2000, 2500)]);

        let report = assert_ok!(registry.run(&api, &records, &settings(false)).await);
        assert_eq!(report.submitted, 3);
        assert_eq!(api.job_count(), 3);

        let report = assert_ok!(registry.fetch(&api, &mut records, &settings(false)).await);
        assert_eq!((report.finished, report.total), (0, 3));

        api.complete(&batch_id(&registry, 1));
        let report = assert_ok!(registry.fetch(&api, &mut records, &settings(false)).await);
        assert_eq!((report.finished, report.total), (1, 3));

        for (index, record) in records.iter().enumerate() {
            if (1000..2000).contains(&index) {
                assert_eq!(
                    record.summary.as_deref(),
                    Some(format!("summary of {}", record.id).as_str())
                );
            } else {
                assert!(record.summary.is_none(), "record {} was touched", index);
            }
        }

        let states: Vec<_> = registry.units().iter().map(|unit| unit.state()).collect();
        assert_eq!(
            states,
            vec![UnitState::Submitted, UnitState::Done, UnitState::Submitted]
        );
    }

    #[tokio::test]
    async fn test_request_files_follow_record_order() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let records = product_records(25);
        let mut registry = registry(&temp);
        registry.create(&records, 10).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();

        let path = registry.layout().request_path("10_20.jsonl");
        let content = std::fs::read_to_string(path).unwrap();
        let ids: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["custom_id"].as_str().unwrap().to_string()
            })
            .collect();
        let expected: Vec<String> = (10..20).map(|id: u64| id.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_fetch_makes_no_calls_for_done_units() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let mut records = product_records(20);
        let mut registry = registry(&temp);
        registry.create(&records, 10).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();

        api.complete(&batch_id(&registry, 0));
        api.complete(&batch_id(&registry, 1));
        let report = registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();
        assert!(report.is_complete());

        let calls = api.calls();
        let snapshot = records.clone();
        for _ in 0..3 {
            let report = registry
                .fetch(&api, &mut records, &settings(false))
                .await
                .unwrap();
            assert_eq!((report.finished, report.total), (2, 2));
            assert_eq!(report.applied, 0);
        }
        assert_eq!(api.calls(), calls);
        assert_eq!(records, snapshot);
        assert_eq!(registry.progress(), (2, 2));
    }

    #[tokio::test]
    async fn test_terminal_status_is_not_finished() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let mut records = product_records(5);
        let mut registry = registry(&temp);
        registry.create(&records, 5).unwrap();
        registry.run(&api, &records, &settings(false)).await.unwrap();

        api.set_status(&batch_id(&registry, 0), BatchJobStatus::Expired);
        let report = registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();

        assert_eq!((report.finished, report.total), (0, 1));
        assert_eq!(registry.units()[0].state(), UnitState::Submitted);
        assert_eq!(api.downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rerun_duplicates_submissions() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let records = product_records(10);
        let mut registry = registry(&temp);
        registry.create(&records, 5).unwrap();

        registry.run(&api, &records, &settings(false)).await.unwrap();
        let first = batch_id(&registry, 0);
        registry.run(&api, &records, &settings(false)).await.unwrap();

        assert_eq!(api.job_count(), 4);
        assert_ne!(batch_id(&registry, 0), first);
    }

    #[tokio::test]
    async fn test_resume_interrupted_run() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let records = product_records(30);
        let mut registry = registry(&temp);
        registry.create(&records, 10).unwrap();

        api.fail_uploads_of("10_20.jsonl");
        let err = assert_err!(registry.run(&api, &records, &settings(false)).await);
        assert!(matches!(err, BatchError::RemoteUpload { ref unit, .. } if unit == "10_20"));
        assert_eq!(api.job_count(), 1);
        assert_eq!(registry.units()[2].state(), UnitState::Pending);

        api.heal_uploads_of("10_20.jsonl");
        let report = registry
            .submit_pending(&api, &records, &settings(false))
            .await
            .unwrap();
        assert_eq!((report.submitted, report.skipped), (2, 1));
        assert_eq!(api.job_count(), 3);
        assert!(registry.units().iter().all(|unit| unit.batch_id().is_some()));
    }

    #[tokio::test]
    async fn test_continue_on_error_submits_the_rest() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let records = product_records(30);
        let mut registry = registry(&temp);
        registry.create(&records, 10).unwrap();

        api.fail_uploads_of("0_10.jsonl");
        let report = registry.run(&api, &records, &settings(true)).await.unwrap();

        assert_eq!(report.submitted, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].unit, "0_10");
        assert!(report.failures[0].error.is_remote());
        assert_eq!(registry.units()[0].state(), UnitState::Pending);
    }

    #[tokio::test]
    async fn test_empty_record_set() {
        let temp = TempDir::new().unwrap();
        let api = FakeBatchApi::new();
        let mut records = product_records(0);
        let mut registry = registry(&temp);

        assert_eq!(registry.create(&records, 1000).unwrap(), 0);
        let report = registry.run(&api, &records, &settings(false)).await.unwrap();
        assert_eq!(report.submitted, 0);
        let report = registry
            .fetch(&api, &mut records, &settings(false))
            .await
            .unwrap();
        assert_eq!((report.finished, report.total), (0, 0));
        assert_eq!(api.calls(), 0);
    }
}
