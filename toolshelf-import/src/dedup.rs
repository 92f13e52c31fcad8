//! Identity keys and duplicate detection.
//!
//! Two records are the same tool when their normalized URLs match or their
//! lowercased names match. Either clash is enough: a renamed entry at a known
//! address and a known name pointing somewhere new are both duplicates.

use std::collections::HashSet;

use toolshelf_catalog::normalize::{generate_id, normalize_url};
use toolshelf_catalog::{Tool, ToolId};

/// The (url, name) pair used to compare records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub url: String,
    pub name: String,
}

impl DedupKey {
    pub fn of(tool: &Tool) -> Self {
        Self {
            url: normalize_url(&tool.url),
            name: tool.name.trim().to_lowercase(),
        }
    }
}

/// Running set of known keys for one merge operation.
///
/// Built from the existing collection before a batch starts and grown as
/// records are accepted, so repeats inside the same batch are caught too.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    urls: HashSet<String>,
    names: HashSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tools(tools: &[Tool]) -> Self {
        let mut set = Self::new();
        for tool in tools {
            set.insert(DedupKey::of(tool));
        }
        set
    }

    /// Keys of every record except the one at `skip`, for checking an
    /// edited record against the rest of its collection.
    pub fn from_tools_except(tools: &[Tool], skip: usize) -> Self {
        let mut set = Self::new();
        for (i, tool) in tools.iter().enumerate() {
            if i != skip {
                set.insert(DedupKey::of(tool));
            }
        }
        set
    }

    /// Record a key. Empty components are never stored, so a blank url or
    /// name can't make unrelated records collide.
    pub fn insert(&mut self, key: DedupKey) {
        if !key.url.is_empty() {
            self.urls.insert(key.url);
        }
        if !key.name.is_empty() {
            self.names.insert(key.name);
        }
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        (!key.url.is_empty() && self.urls.contains(&key.url))
            || (!key.name.is_empty() && self.names.contains(&key.name))
    }

    pub fn is_duplicate(&self, tool: &Tool) -> bool {
        self.contains(&DedupKey::of(tool))
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.names.is_empty()
    }
}

/// Ids taken within one collection.
///
/// Ids compare by their text, matching [`ToolId::same_as`]: `7` and `"7"`
/// are the same id.
#[derive(Debug, Clone, Default)]
pub struct IdSet {
    ids: HashSet<String>,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tools(tools: &[Tool]) -> Self {
        let mut set = Self::new();
        for tool in tools {
            set.insert(&tool.id);
        }
        set
    }

    pub fn contains(&self, id: &ToolId) -> bool {
        self.ids.contains(&id.to_string())
    }

    /// Returns false when the id was already taken.
    pub fn insert(&mut self, id: &ToolId) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Take `id`, or a freshly generated one when `id` is already in use.
    pub fn claim(&mut self, id: ToolId) -> ToolId {
        let mut id = id;
        while !self.insert(&id) {
            id = generate_id();
        }
        id
    }
}
