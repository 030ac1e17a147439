//! Product records
//!
//! A [`Record`] is one product datapoint: an identifier, the text the model
//! reads, and the summary the batch results fill in. [`RecordSet`] is the
//! ordered, validated collection the batch lifecycle works on.

use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Prefix the price follows in a training prompt
pub const PRICE_PREFIX: &str = "Price is $";

/// Question asked in a training prompt
pub const PRICE_QUESTION: &str = "What does this cost to the nearest dollar?";

/// A product datapoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, also the batch correlation id
    pub id: u64,
    pub title: String,
    pub category: String,
    pub price: f64,
    /// Full product text sent to the model
    pub full: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Generated summary, filled in when batch results are applied
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Record {
    /// Build a record with the required fields and validate it
    pub fn new(
        id: u64,
        title: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        full: impl Into<String>,
    ) -> Result<Self> {
        let record = Self {
            id,
            title: title.into(),
            category: category.into(),
            price,
            full: full.into(),
            weight: None,
            summary: None,
            prompt: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the schema constraints
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BatchError::InvalidRecord(format!(
                "record {} has an empty title",
                self.id
            )));
        }
        if self.full.trim().is_empty() {
            return Err(BatchError::InvalidRecord(format!(
                "record {} has no input text",
                self.id
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(BatchError::InvalidRecord(format!(
                "record {} has invalid price {}",
                self.id, self.price
            )));
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(BatchError::InvalidRecord(format!(
                    "record {} has invalid weight {}",
                    self.id, weight
                )));
            }
        }
        Ok(())
    }

    /// Set the price-question prompt around `text`
    pub fn make_prompt(&mut self, text: &str) {
        self.prompt = Some(format!(
            "{}\n\n{}\n\n{}{}.00",
            PRICE_QUESTION,
            text,
            PRICE_PREFIX,
            self.price.round_ties_even()
        ));
    }

    /// The prompt cut right after the price prefix, for evaluation
    pub fn test_prompt(&self) -> Option<String> {
        self.prompt.as_ref().map(|prompt| {
            let question = prompt.split(PRICE_PREFIX).next().unwrap_or_default();
            format!("{}{}", question, PRICE_PREFIX)
        })
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} = ${:.2}>", self.title, self.price)
    }
}

/// Ordered collection of validated records with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    positions: HashMap<u64, usize>,
}

impl RecordSet {
    /// Validate every record and index them by id
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            record.validate()?;
            if positions.insert(record.id, index).is_some() {
                return Err(BatchError::InvalidRecord(format!(
                    "duplicate record id {}",
                    record.id
                )));
            }
        }
        Ok(Self { records, positions })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Records in the half-open index range `[start, end)`
    pub fn range(&self, start: usize, end: usize) -> Option<&[Record]> {
        self.records.get(start..end)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Record> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Position of the record with `id`. Ids usually equal positions, so that
    /// is checked before the index.
    pub fn position(&self, id: u64) -> Option<usize> {
        let direct = usize::try_from(id).ok();
        match direct.and_then(|index| self.records.get(index)) {
            Some(record) if record.id == id => direct,
            _ => self.positions.get(&id).copied(),
        }
    }

    /// Overwrite the summary of the record with `id`; false if unknown
    pub fn set_summary(&mut self, id: u64, summary: String) -> bool {
        match self.position(id) {
            Some(index) => {
                self.records[index].summary = Some(summary);
                true
            }
            None => false,
        }
    }

    /// Number of records in `[start, end)` without a summary
    pub fn missing_summaries(&self, start: usize, end: usize) -> usize {
        self.range(start, end)
            .map(|slice| slice.iter().filter(|r| r.summary.is_none()).count())
            .unwrap_or(end.saturating_sub(start))
    }

    pub fn into_inner(self) -> Vec<Record> {
        self.records
    }

    /// Read records from a JSONL file, one record per line
    pub async fn read_jsonl(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut records = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line).map_err(|e| {
                BatchError::InvalidRecord(format!(
                    "{} line {}: {}",
                    path.display(),
                    number + 1,
                    e
                ))
            })?;
            records.push(record);
        }
        debug!(path = %path.display(), count = records.len(), "Read records");
        Self::new(records)
    }

    /// Write records to a JSONL file, one record per line
    pub async fn write_jsonl(&self, path: &Path) -> Result<()> {
        let mut buffer = Vec::new();
        for record in &self.records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}
