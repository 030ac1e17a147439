//! Batch partitioner
//!
//! Splits `len` records into contiguous `[start, end)` chunks of at most
//! `chunk_size` records each.

use super::unit::BatchUnit;
use crate::utils::error::{BatchError, Result};

/// Partition `len` records into `ceil(len / chunk_size)` units
pub fn partition(len: usize, chunk_size: usize) -> Result<Vec<BatchUnit>> {
    if chunk_size == 0 {
        return Err(BatchError::Config(
            "chunk size must be at least 1".to_string(),
        ));
    }

    Ok((0..len)
        .step_by(chunk_size)
        .map(|start| BatchUnit::new(start, (start + chunk_size).min(len)))
        .collect())
}
