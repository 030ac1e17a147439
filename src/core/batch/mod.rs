//! Batch lifecycle
//!
//! Records are partitioned into contiguous units; each unit is rendered to a
//! request file, uploaded, submitted as a remote batch job, polled, downloaded
//! and applied back onto the records. A [`BatchRegistry`] runs these steps over
//! all units and can be saved to and restored from a snapshot file.

mod layout;
mod partition;
mod registry;
mod snapshot;
mod types;
mod unit;


// Re-export all public types
pub use layout::{BATCHES_FOLDER, BatchLayout, OUTPUT_FOLDER};
pub use partition::partition;
pub use registry::{BatchRegistry, FetchReport, RunReport, UnitFailure};
pub use snapshot::{RegistrySnapshot, SNAPSHOT_VERSION, load, read_snapshot, save};
pub use types::{
    BATCH_METHOD, BatchHttpResponse, BatchItem, BatchResult, ChatCompletionBody, ChatMessage,
    ResultBody, ResultChoice, ResultMessage,
};
pub use unit::{BatchUnit, UnitState};
