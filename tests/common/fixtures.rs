//! Test fixtures and data factories
//!
//! Factories build real records and settings, not mocks.

use litebatch::config::BatchSettings;
use litebatch::{Record, RecordSet};
use std::path::Path;

/// Create a product record with predictable text
pub fn product(id: u64) -> Record {
    Record::new(
        id,
        format!("Product {}", id),
        "Appliances",
        10.0 + (id % 50) as f64,
        format!("Title: Product {}\nDetails: a sturdy appliance, model {}", id, id),
    )
    .expect("fixture record is valid")
}

/// Create `n` records with ids `0..n`
pub fn product_records(n: u64) -> RecordSet {
    RecordSet::new((0..n).map(product).collect()).expect("fixture records are valid")
}

/// Default batch settings with the failure policy chosen by the caller
pub fn settings(continue_on_error: bool) -> BatchSettings {
    BatchSettings {
        continue_on_error,
        ..Default::default()
    }
}

/// Write `records` to `path` as JSONL
pub async fn write_records(records: &RecordSet, path: &Path) {
    records
        .write_jsonl(path)
        .await
        .expect("failed to write fixture records");
}
