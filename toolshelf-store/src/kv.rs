//! String key-value persistence with change notification.
//!
//! [`MemoryStore`] lives for one process. [`FileStore`] keeps one file per
//! key under a directory, so several processes pointed at the same
//! directory share state; [`FileStore::poll`] turns writes made by the
//! others into the same [`ChangeEvent`]s a local write produces.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tokio::sync::broadcast;

use crate::error::StoreError;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

const VALUE_EXTENSION: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Removed,
}

/// Notification that `key` was written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    fn set(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: ChangeKind::Set,
        }
    }

    fn removed(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: ChangeKind::Removed,
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error and sends no event.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(events: &broadcast::Sender<ChangeEvent>, event: ChangeEvent) {
    log::debug!("Store key '{}' changed ({:?})", event.key, event.kind);
    // No subscribers is fine.
    let _ = events.send(event);
}

// ── In-memory ───────────────────────────────────────────────────────────────

pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            values: Mutex::new(HashMap::new()),
            events,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        notify(&self.events, ChangeEvent::set(key));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if lock(&self.values).remove(key).is_some() {
            notify(&self.events, ChangeEvent::removed(key));
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}

// ── On disk ─────────────────────────────────────────────────────────────────

/// Modification time and length, enough to notice a rewrite.
type Stamp = (SystemTime, u64);

/// One `<key>.json` file per key under `dir`.
pub struct FileStore {
    dir: PathBuf,
    seen: Mutex<HashMap<String, Stamp>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// Files already present are recorded as seen, so the first
    /// [`poll`](Self::poll) only reports changes made after opening.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let seen = scan(&dir)?;
        log::debug!("Opened file store at {} ({} keys)", dir.display(), seen.len());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            dir,
            seen: Mutex::new(seen),
            events,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    /// Compare the directory against what this instance last saw and
    /// broadcast an event for every key another writer changed.
    pub fn poll(&self) -> Result<Vec<ChangeEvent>, StoreError> {
        let current = scan(&self.dir)?;
        let mut seen = lock(&self.seen);

        let mut changes: Vec<ChangeEvent> = current
            .iter()
            .filter(|(key, stamp)| seen.get(*key) != Some(*stamp))
            .map(|(key, _)| ChangeEvent::set(key))
            .collect();
        changes.extend(
            seen.keys()
                .filter(|key| !current.contains_key(*key))
                .map(|key| ChangeEvent::removed(key)),
        );
        changes.sort_by(|a, b| a.key.cmp(&b.key));

        *seen = current;
        drop(seen);

        for change in &changes {
            notify(&self.events, change.clone());
        }
        Ok(changes)
    }

    fn remember(&self, key: &str, path: &Path) {
        let mut seen = lock(&self.seen);
        match stamp_of(path) {
            Some(stamp) => {
                seen.insert(key.to_string(), stamp);
            }
            None => {
                seen.remove(key);
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));
        fs::write(&tmp, value).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        self.remember(key, &path);
        notify(&self.events, ChangeEvent::set(key));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                self.remember(key, &path);
                notify(&self.events, ChangeEvent::removed(key));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}

fn stamp_of(path: &Path) -> Option<Stamp> {
    let meta = fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

fn scan(dir: &Path) -> Result<HashMap<String, Stamp>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    let mut found = HashMap::new();
    for entry in entries {
        let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
            continue;
        }
        let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(stamp) = stamp_of(&path) {
            found.insert(key.to_string(), stamp);
        }
    }
    Ok(found)
}
