//! Persistence for the tool collection.
//!
//! A [`CatalogStore`] combines a [`KeyValueStore`] (where the administrator's
//! copy is saved) with a [`DocumentSource`] (the shipped catalog) and the
//! built-in defaults. The CLI opens one with [`open_store`] from the resolved
//! [`settings`].

pub mod catalog;
pub mod error;
pub mod kv;
pub mod settings;
pub mod source;

use std::path::PathBuf;
use std::sync::Arc;

pub use catalog::{CatalogStore, ImportGuard, LoadOrigin, LoadState, OVERRIDE_KEY};
pub use error::StoreError;
pub use kv::{ChangeEvent, ChangeKind, FileStore, KeyValueStore, MemoryStore};
pub use source::{DocumentSource, FileSource, HttpSource, SourceError, source_for};

/// Open a file-backed store in `dir`, reading the shipped catalog from
/// `document`.
///
/// Returns the [`FileStore`] alongside the catalog so callers can
/// [`poll`](FileStore::poll) it for changes made by other processes.
pub fn open_store(
    dir: impl Into<PathBuf>,
    document: &str,
) -> Result<(CatalogStore, Arc<FileStore>), StoreError> {
    let kv = Arc::new(FileStore::open(dir)?);
    let source = source_for(document)?;
    let store = CatalogStore::new(kv.clone(), source);
    Ok((store, kv))
}
