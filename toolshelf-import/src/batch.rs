//! Batch import of raw records into an existing collection.
//!
//! Candidates are normalized, checked for the required fields and compared
//! against a running [`KeySet`]. The work is done in fixed-size chunks so a
//! host can report progress between them; the chunk size changes only the
//! pacing of progress updates, never which records land in which bucket.
//!
//! Accepted records keep their id unless another record already uses it,
//! in which case they get a fresh one. They are placed ahead of the existing collection as one
//! block, so the newest imports show first.

use serde_json::Value;
use tokio::sync::mpsc;
use toolshelf_catalog::{Tool, normalize};

use crate::dedup::{DedupKey, IdSet, KeySet};
use crate::error::ImportError;
use crate::progress::{ImportEvent, ImportProgress};

/// Number of candidates classified between progress updates.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Tuning knobs for an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub batch_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportOptions {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Counters for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub total: usize,
    pub added: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

impl ImportStats {
    pub fn summary(&self) -> String {
        format!(
            "Import complete: +{} added, {} duplicates, {} skipped (missing fields)",
            self.added, self.duplicates, self.rejected
        )
    }
}

/// Result of classifying every candidate.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Newly accepted records, in input order.
    pub accepted: Vec<Tool>,
    /// Normalized candidates that clashed with an existing or earlier record.
    pub duplicates: Vec<Tool>,
    /// Raw candidates missing a name, url or category after normalization.
    pub rejected: Vec<Value>,
    /// `accepted` followed by the existing collection.
    pub collection: Vec<Tool>,
    pub stats: ImportStats,
}

/// Progress after one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTick {
    pub processed: usize,
    pub total: usize,
}

/// A resumable import run.
///
/// Iterating yields one [`ImportTick`] per chunk; [`finish`](Self::finish)
/// classifies anything left and returns the outcome.
pub struct BatchImporter {
    pending: std::vec::IntoIter<Value>,
    existing: Vec<Tool>,
    keys: KeySet,
    ids: IdSet,
    batch_size: usize,
    total: usize,
    processed: usize,
    accepted: Vec<Tool>,
    duplicates: Vec<Tool>,
    rejected: Vec<Value>,
}

impl BatchImporter {
    /// Start an import. The key and id sets are built from `existing` here,
    /// once.
    pub fn new(candidates: Vec<Value>, existing: Vec<Tool>, options: &ImportOptions) -> Self {
        let keys = KeySet::from_tools(&existing);
        let ids = IdSet::from_tools(&existing);
        Self {
            total: candidates.len(),
            pending: candidates.into_iter(),
            existing,
            keys,
            ids,
            batch_size: options.batch_size.max(1),
            processed: 0,
            accepted: Vec::new(),
            duplicates: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn classify(&mut self, raw: Value) {
        let mut tool = normalize(&raw);
        if !tool.is_importable() {
            log::debug!("Rejecting record without name/url/category: {}", raw);
            self.rejected.push(raw);
        } else if self.keys.is_duplicate(&tool) {
            log::debug!("Skipping duplicate '{}' ({})", tool.name, tool.url);
            self.duplicates.push(tool);
        } else {
            let id = self.ids.claim(tool.id.clone());
            if id != tool.id {
                log::debug!("Id {} of '{}' is taken, using {}", tool.id, tool.name, id);
                tool.id = id;
            }
            self.keys.insert(DedupKey::of(&tool));
            self.accepted.push(tool);
        }
        self.processed += 1;
    }

    /// Classify any remaining candidates and assemble the merged collection.
    pub fn finish(mut self) -> ImportOutcome {
        let remaining: Vec<Value> = self.pending.by_ref().collect();
        for raw in remaining {
            self.classify(raw);
        }

        let stats = ImportStats {
            total: self.total,
            added: self.accepted.len(),
            duplicates: self.duplicates.len(),
            rejected: self.rejected.len(),
        };

        let mut collection = Vec::with_capacity(self.accepted.len() + self.existing.len());
        collection.extend(self.accepted.iter().cloned());
        collection.extend(self.existing);

        ImportOutcome {
            accepted: self.accepted,
            duplicates: self.duplicates,
            rejected: self.rejected,
            collection,
            stats,
        }
    }
}

impl Iterator for BatchImporter {
    type Item = ImportTick;

    fn next(&mut self) -> Option<ImportTick> {
        if self.processed >= self.total {
            return None;
        }
        for _ in 0..self.batch_size {
            match self.pending.next() {
                Some(raw) => self.classify(raw),
                None => break,
            }
        }
        Some(ImportTick {
            processed: self.processed,
            total: self.total,
        })
    }
}

/// Import a parsed JSON document. Anything other than an array is refused.
pub fn import_batch(
    candidates: &Value,
    existing: &[Tool],
    options: &ImportOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportOutcome, ImportError> {
    let items = candidates.as_array().ok_or(ImportError::NotAnArray)?;
    Ok(import_records(
        items.clone(),
        existing.to_vec(),
        options,
        progress,
    ))
}

/// Import already-extracted candidates, reporting each chunk to `progress`.
pub fn import_records(
    candidates: Vec<Value>,
    existing: Vec<Tool>,
    options: &ImportOptions,
    progress: Option<&dyn ImportProgress>,
) -> ImportOutcome {
    let mut importer = BatchImporter::new(candidates, existing, options);
    if let Some(p) = progress {
        p.on_phase(&format!("Importing {} records", importer.total()));
    }

    for tick in importer.by_ref() {
        if let Some(p) = progress {
            p.on_batch(tick.processed, tick.total);
        }
    }

    let outcome = importer.finish();
    if let Some(p) = progress {
        p.on_complete(&outcome.stats.summary());
    }
    outcome
}

/// Async variant of [`import_records`].
///
/// Yields to the scheduler after every chunk so a UI task sharing the
/// runtime stays responsive, and reports through `events`. A closed
/// channel does not stop the import.
pub async fn import_records_async(
    candidates: Vec<Value>,
    existing: Vec<Tool>,
    options: ImportOptions,
    events: mpsc::UnboundedSender<ImportEvent>,
) -> ImportOutcome {
    let mut importer = BatchImporter::new(candidates, existing, &options);
    let _ = events.send(ImportEvent::Started {
        total: importer.total(),
    });

    for tick in importer.by_ref() {
        let _ = events.send(ImportEvent::Batch {
            processed: tick.processed,
            total: tick.total,
        });
        tokio::task::yield_now().await;
    }

    let outcome = importer.finish();
    let _ = events.send(ImportEvent::Finished(outcome.stats.clone()));
    outcome
}
