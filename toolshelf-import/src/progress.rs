//! Import progress reporting.

/// Receives progress updates from a synchronous import.
pub trait ImportProgress {
    /// Called after each chunk of candidates has been classified.
    fn on_batch(&self, processed: usize, total: usize);

    /// Called when a phase starts (e.g. "Importing 1200 records").
    fn on_phase(&self, message: &str);

    /// Called once the partition is final.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_batch(&self, _processed: usize, _total: usize) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_batch(&self, processed: usize, total: usize) {
        log::info!("  Importing… {}/{}", processed, total);
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Progress event sent by the async importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// The batch has been validated as an array of `total` candidates.
    Started { total: usize },
    /// A chunk finished; `processed` of `total` candidates are classified.
    Batch { processed: usize, total: usize },
    /// Classification finished.
    Finished(crate::batch::ImportStats),
}
