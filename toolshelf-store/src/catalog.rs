//! The live tool collection and the admin commands that change it.
//!
//! Reads resolve in priority order: the administrator's saved override,
//! then the shipped document, then the built-in defaults. Every write goes
//! through [`CatalogStore::replace`], which persists the whole collection
//! under [`OVERRIDE_KEY`] and notifies subscribers of the key-value store.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::broadcast;
use toolshelf_catalog::normalize::{derive_logo, generate_id};
use toolshelf_catalog::{
    CatalogStats, NewTool, Tool, ToolEdit, ToolId, builtin_tools, catalog_stats, export_json,
    normalize, normalize_all, parse_tool_array, read_tool_file,
};
use toolshelf_import::{
    IdSet, ImportOptions, ImportOutcome, ImportProgress, KeySet, import_records,
};

use crate::error::StoreError;
use crate::kv::{ChangeEvent, KeyValueStore};
use crate::source::DocumentSource;

/// Key the administrator's copy of the collection is saved under.
pub const OVERRIDE_KEY: &str = "tools_override";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

/// Which tier the current collection was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Override,
    Document,
    Builtin,
}

struct Snapshot {
    state: LoadState,
    origin: LoadOrigin,
    tools: Arc<[Tool]>,
}

pub struct CatalogStore {
    kv: Arc<dyn KeyValueStore>,
    source: Option<Box<dyn DocumentSource>>,
    snapshot: Mutex<Snapshot>,
    importing: AtomicBool,
}

impl CatalogStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, source: Box<dyn DocumentSource>) -> Self {
        Self::build(kv, Some(source))
    }

    /// A store with no shipped document: override, else built-in defaults.
    pub fn without_source(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::build(kv, None)
    }

    fn build(kv: Arc<dyn KeyValueStore>, source: Option<Box<dyn DocumentSource>>) -> Self {
        Self {
            kv,
            source,
            snapshot: Mutex::new(Snapshot {
                state: LoadState::Uninitialized,
                origin: LoadOrigin::Builtin,
                tools: Arc::from(Vec::new()),
            }),
            importing: AtomicBool::new(false),
        }
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> LoadState {
        self.snapshot().state
    }

    pub fn origin(&self) -> LoadOrigin {
        self.snapshot().origin
    }

    pub fn source_description(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.describe())
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    /// Resolve the collection from scratch and cache it.
    ///
    /// Never fails: an unreadable override or document is logged and the
    /// next tier is tried.
    pub fn load(&self) -> Arc<[Tool]> {
        self.snapshot().state = LoadState::Loading;

        let (origin, tools) = if let Some(tools) = self.load_override() {
            (LoadOrigin::Override, tools)
        } else if let Some(tools) = self.load_document() {
            (LoadOrigin::Document, tools)
        } else {
            log::debug!("Using built-in tool list");
            (LoadOrigin::Builtin, builtin_tools())
        };
        log::debug!("Loaded {} tools ({:?})", tools.len(), origin);

        let tools: Arc<[Tool]> = Arc::from(tools);
        let mut snapshot = self.snapshot();
        snapshot.state = LoadState::Ready;
        snapshot.origin = origin;
        snapshot.tools = Arc::clone(&tools);
        tools
    }

    fn load_override(&self) -> Option<Vec<Tool>> {
        let text = match self.kv.get(OVERRIDE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Could not read saved tool list: {}", e);
                return None;
            }
        };
        match parse_tool_array(&text) {
            Ok(items) if !items.is_empty() => Some(normalize_all(&items)),
            Ok(_) => {
                log::debug!("Saved tool list is empty, ignoring it");
                None
            }
            Err(e) => {
                log::warn!("Saved tool list is unreadable, ignoring it: {}", e);
                None
            }
        }
    }

    fn load_document(&self) -> Option<Vec<Tool>> {
        let source = self.source.as_ref()?;
        match source.fetch() {
            Ok(items) if !items.is_empty() => Some(normalize_all(&items)),
            Ok(_) => {
                log::debug!("Document {} is empty", source.describe());
                None
            }
            Err(e) => {
                log::debug!("Document {} unavailable: {}", source.describe(), e);
                None
            }
        }
    }

    /// The cached collection, loading it on first use.
    pub fn current(&self) -> Arc<[Tool]> {
        {
            let snapshot = self.snapshot();
            if snapshot.state == LoadState::Ready {
                return Arc::clone(&snapshot.tools);
            }
        }
        self.load()
    }

    pub fn stats(&self) -> CatalogStats {
        catalog_stats(&self.current())
    }

    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(export_json(&self.current())?)
    }

    /// Write the export to `path`, returning the number of records written.
    pub fn export_to(&self, path: &Path) -> Result<usize, StoreError> {
        let tools = self.current();
        let text = export_json(&tools)?;
        std::fs::write(path, text).map_err(|e| StoreError::io(path, e))?;
        log::info!("Exported {} tools to {}", tools.len(), path.display());
        Ok(tools.len())
    }

    // ── Writes ──────────────────────────────────────────────────────────────

    /// Persist `tools` as the override and make them current.
    pub fn replace(&self, tools: Vec<Tool>) -> Result<Arc<[Tool]>, StoreError> {
        let text = serde_json::to_string(&tools)?;
        self.kv.set(OVERRIDE_KEY, &text)?;

        let tools: Arc<[Tool]> = Arc::from(tools);
        let mut snapshot = self.snapshot();
        snapshot.state = LoadState::Ready;
        snapshot.origin = LoadOrigin::Override;
        snapshot.tools = Arc::clone(&tools);
        Ok(tools)
    }

    /// Drop the override and reload from the document or defaults.
    pub fn reset(&self) -> Result<Arc<[Tool]>, StoreError> {
        self.kv.remove(OVERRIDE_KEY)?;
        log::info!("Saved tool list cleared");
        Ok(self.load())
    }

    /// Add one record ahead of the rest.
    pub fn add(&self, mut new: NewTool) -> Result<Tool, StoreError> {
        new.url = assume_https(&new.url);
        let mut raw = serde_json::to_value(&new)?;
        if let Value::Object(obj) = &mut raw {
            obj.insert("id".into(), serde_json::to_value(generate_id())?);
        }
        let mut tool = normalize(&raw);
        if !tool.is_importable() {
            return Err(StoreError::InvalidRecord(
                "name, a valid url and category are required".into(),
            ));
        }

        let current = self.current();
        tool.id = IdSet::from_tools(&current).claim(tool.id);
        if KeySet::from_tools(&current).is_duplicate(&tool) {
            log::warn!("'{}' matches an existing tool by name or url", tool.name);
        }

        let mut tools = Vec::with_capacity(current.len() + 1);
        tools.push(tool.clone());
        tools.extend(current.iter().cloned());
        self.replace(tools)?;
        log::info!("Added '{}' ({})", tool.name, tool.id);
        Ok(tool)
    }

    /// Apply `edit` to the record with `id` and re-normalize it.
    ///
    /// A logo that was derived from the old url is dropped when the url
    /// changes so it is derived again from the new one.
    pub fn update(&self, id: &ToolId, edit: ToolEdit) -> Result<Tool, StoreError> {
        let current = self.current();
        let index = position_of(&current, id)?;
        let before = &current[index];

        let mut raw = serde_json::to_value(before)?;
        if let Value::Object(obj) = &mut raw {
            let mut put = |key: &str, value: Value| {
                obj.insert(key.to_string(), value);
            };
            if let Some(v) = edit.name {
                put("name", v.into());
            }
            if let Some(v) = edit.description {
                put("description", v.into());
            }
            if let Some(v) = edit.category {
                put("category", v.into());
            }
            if let Some(v) = edit.section {
                put("section", v.into());
            }
            if let Some(v) = edit.pricing_text {
                put("pricing_text", v.into());
            }
            if let Some(v) = edit.featured {
                put("featured", v.into());
            }
            if let Some(v) = edit.top {
                put("top", v.into());
            }
            if let Some(v) = edit.verified {
                put("verified", v.into());
            }
            if let Some(v) = edit.url {
                put("url", assume_https(&v).into());
                if before.logo == derive_logo(&before.url, "") {
                    obj.remove("logo");
                }
            }
        }

        let tool = normalize(&raw);
        if !tool.is_importable() {
            return Err(StoreError::InvalidRecord(format!(
                "edit would leave '{}' without a name, url or category",
                before.name
            )));
        }

        if KeySet::from_tools_except(&current, index).is_duplicate(&tool) {
            log::warn!("'{}' now matches another tool by name or url", tool.name);
        }

        let mut tools = current.to_vec();
        tools[index] = tool.clone();
        self.replace(tools)?;
        log::info!("Updated '{}' ({})", tool.name, tool.id);
        Ok(tool)
    }

    /// Delete the record with `id`, returning it.
    pub fn remove(&self, id: &ToolId) -> Result<Tool, StoreError> {
        let mut tools = self.current().to_vec();
        let index = position_of(&tools, id)?;
        let removed = tools.remove(index);
        self.replace(tools)?;
        log::info!("Deleted '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    // ── Import ──────────────────────────────────────────────────────────────

    /// Claim the import slot. Only one import may run at a time; the slot
    /// is released when the guard drops.
    pub fn begin_import(&self) -> Result<ImportGuard<'_>, StoreError> {
        self.importing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StoreError::ImportInProgress)?;
        Ok(ImportGuard { store: self })
    }

    pub fn import_in_progress(&self) -> bool {
        self.importing.load(Ordering::Acquire)
    }

    /// Import already-parsed candidates and save the merged collection.
    pub fn import_values(
        &self,
        candidates: Vec<Value>,
        options: &ImportOptions,
        progress: Option<&dyn ImportProgress>,
    ) -> Result<ImportOutcome, StoreError> {
        let guard = self.begin_import()?;
        let outcome = import_records(candidates, guard.existing(), options, progress);
        guard.commit(&outcome)?;
        Ok(outcome)
    }

    /// Import pasted JSON text.
    pub fn import_text(
        &self,
        text: &str,
        options: &ImportOptions,
        progress: Option<&dyn ImportProgress>,
    ) -> Result<ImportOutcome, StoreError> {
        let candidates = parse_tool_array(text)?;
        self.import_values(candidates, options, progress)
    }

    /// Import a `.json` file.
    pub fn import_file(
        &self,
        path: &Path,
        options: &ImportOptions,
        progress: Option<&dyn ImportProgress>,
    ) -> Result<ImportOutcome, StoreError> {
        let candidates = read_tool_file(path)?;
        self.import_values(candidates, options, progress)
    }

    // ── Notification ────────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.kv.subscribe()
    }

    /// Reload when `event` concerns the override; other keys are ignored.
    pub fn reload_if_changed(&self, event: &ChangeEvent) -> Option<Arc<[Tool]>> {
        if event.key != OVERRIDE_KEY {
            return None;
        }
        Some(self.load())
    }
}

/// Exclusive claim on a store's import slot.
///
/// Hosts that drive the async importer themselves take the guard, read
/// [`existing`](Self::existing), run the import and hand the outcome to
/// [`commit`](Self::commit).
pub struct ImportGuard<'a> {
    store: &'a CatalogStore,
}

impl ImportGuard<'_> {
    /// The collection the import merges into.
    pub fn existing(&self) -> Vec<Tool> {
        self.store.current().to_vec()
    }

    /// Save the merged collection. Nothing is written when no candidate
    /// was accepted.
    pub fn commit(self, outcome: &ImportOutcome) -> Result<(), StoreError> {
        if outcome.stats.added == 0 {
            log::info!("Nothing new to save");
            return Ok(());
        }
        self.store.replace(outcome.collection.clone())?;
        Ok(())
    }
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.store.importing.store(false, Ordering::Release);
    }
}

/// Hand-typed addresses often omit the scheme.
fn assume_https(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn position_of(tools: &[Tool], id: &ToolId) -> Result<usize, StoreError> {
    tools
        .iter()
        .position(|t| t.id.same_as(id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}
