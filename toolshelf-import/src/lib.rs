//! Merge raw records into a tool collection.
//!
//! This crate owns the import pipeline: normalizing candidates, rejecting
//! records that lack required fields, detecting duplicates against the
//! existing collection and within the batch, and reporting progress while
//! doing so.

pub mod async_util;
pub mod batch;
pub mod dedup;
pub mod error;
pub mod progress;

pub use async_util::run_with_events;
pub use batch::{
    BatchImporter, DEFAULT_BATCH_SIZE, ImportOptions, ImportOutcome, ImportStats, ImportTick,
    import_batch, import_records, import_records_async,
};
pub use dedup::{DedupKey, IdSet, KeySet};
pub use error::ImportError;
pub use progress::{ImportEvent, ImportProgress, LogProgress, SilentProgress};
