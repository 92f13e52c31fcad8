use std::sync::Arc;

use serde_json::json;
use toolshelf_catalog::{NewTool, ToolEdit, ToolId};
use toolshelf_import::{ImportError, ImportOptions};
use toolshelf_store::*;

fn memory() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn write_document(dir: &tempfile::TempDir, body: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("tools.json");
    std::fs::write(&path, body.to_string()).unwrap();
    path
}

// ── Loading ─────────────────────────────────────────────────────────────────

#[test]
fn falls_back_to_builtins_without_source() {
    let store = CatalogStore::without_source(memory());
    assert_eq!(store.state(), LoadState::Uninitialized);
    let tools = store.current();
    assert_eq!(store.state(), LoadState::Ready);
    assert_eq!(store.origin(), LoadOrigin::Builtin);
    assert_eq!(tools.len(), 12);
    assert_eq!(tools[0].name, "ChatGPT");
}

#[test]
fn document_is_used_when_no_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        &json!([{ "id": 1, "name": "Doc Tool", "url": "https://doc.example", "category": "Coding" }]),
    );
    let store = CatalogStore::new(memory(), Box::new(FileSource::new(path)));
    let tools = store.load();
    assert_eq!(store.origin(), LoadOrigin::Document);
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "Doc Tool");
}

#[test]
fn missing_or_empty_document_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    let missing = CatalogStore::new(memory(), Box::new(FileSource::new(dir.path().join("nope.json"))));
    assert_eq!(missing.load().len(), 12);

    let path = write_document(&dir, &json!([]));
    let empty = CatalogStore::new(memory(), Box::new(FileSource::new(path)));
    assert_eq!(empty.load().len(), 12);
    assert_eq!(empty.origin(), LoadOrigin::Builtin);
}

#[test]
fn override_beats_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        &json!([{ "name": "Doc Tool", "url": "https://doc.example", "category": "Coding" }]),
    );
    let kv = memory();
    kv.set(
        OVERRIDE_KEY,
        &json!([{ "id": 9, "name": "Mine", "url": "https://mine.example", "category": "Image" }]).to_string(),
    )
    .unwrap();
    let store = CatalogStore::new(kv, Box::new(FileSource::new(path)));
    let tools = store.load();
    assert_eq!(store.origin(), LoadOrigin::Override);
    assert_eq!(tools[0].name, "Mine");
}

#[test]
fn corrupt_or_empty_override_is_ignored() {
    let kv = memory();
    kv.set(OVERRIDE_KEY, "{not json").unwrap();
    let store = CatalogStore::without_source(kv.clone());
    assert_eq!(store.load().len(), 12);

    kv.set(OVERRIDE_KEY, "[]").unwrap();
    assert_eq!(store.load().len(), 12);
    assert_eq!(store.origin(), LoadOrigin::Builtin);
}

// ── Writes ──────────────────────────────────────────────────────────────────

#[test]
fn replace_persists_and_notifies() {
    let kv = memory();
    let store = CatalogStore::without_source(kv.clone());
    let mut rx = store.subscribe();

    let mut tools = store.current().to_vec();
    tools.truncate(3);
    store.replace(tools).unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.key, OVERRIDE_KEY);
    assert_eq!(event.kind, ChangeKind::Set);

    // A second store over the same key-value store sees the saved list.
    let other = CatalogStore::without_source(kv);
    assert_eq!(other.load().len(), 3);
    assert_eq!(other.origin(), LoadOrigin::Override);
}

#[test]
fn add_prepends_with_fresh_id() {
    let store = CatalogStore::without_source(memory());
    let tool = store
        .add(NewTool {
            name: "Perplexity".into(),
            category: "AI Writing".into(),
            url: "perplexity.ai".into(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(tool.url, "https://perplexity.ai");
    assert!(matches!(tool.id, ToolId::Int(n) if n > 12));
    let tools = store.current();
    assert_eq!(tools.len(), 13);
    assert_eq!(tools[0].name, "Perplexity");
}

#[test]
fn add_requires_a_usable_url() {
    let store = CatalogStore::without_source(memory());
    let err = store
        .add(NewTool {
            name: "Nowhere".into(),
            category: "Other".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord(_)));
    assert_eq!(store.current().len(), 12);
}

#[test]
fn update_matches_ids_by_text() {
    let store = CatalogStore::without_source(memory());
    let id = ToolId::Text("1".into());
    let updated = store
        .update(
            &id,
            ToolEdit {
                name: Some("ChatGPT Plus".into()),
                verified: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, ToolId::Int(1));
    assert_eq!(updated.name, "ChatGPT Plus");
    assert!(updated.verified);
    assert_eq!(store.current()[0].name, "ChatGPT Plus");
}

#[test]
fn url_change_rederives_logo_only_when_derived() {
    let store = CatalogStore::without_source(memory());
    let derived = store
        .update(
            &ToolId::Int(1),
            ToolEdit {
                url: Some("https://openai.com".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(derived.logo, "https://logo.clearbit.com/openai.com");

    let explicit = store
        .update(
            &ToolId::Int(2),
            ToolEdit {
                url: Some("https://claude.com".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(explicit.logo, "https://logo.clearbit.com/anthropic.com");
}

#[test]
fn remove_and_not_found() {
    let store = CatalogStore::without_source(memory());
    let removed = store.remove(&ToolId::Int(12)).unwrap();
    assert_eq!(removed.name, "Cursor");
    assert_eq!(store.current().len(), 11);

    let err = store.remove(&ToolId::Int(12)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == "12"));
}

#[test]
fn reset_drops_override() {
    let kv = memory();
    let store = CatalogStore::without_source(kv.clone());
    store.remove(&ToolId::Int(1)).unwrap();
    assert_eq!(store.current().len(), 11);

    let tools = store.reset().unwrap();
    assert_eq!(tools.len(), 12);
    assert_eq!(kv.get(OVERRIDE_KEY).unwrap(), None);
}

// ── Import ──────────────────────────────────────────────────────────────────

#[test]
fn import_text_prepends_new_records() {
    let store = CatalogStore::without_source(memory());
    let text = json!([
        { "name": "New One", "url": "https://new.example", "category": "Video" },
        { "name": "chatgpt", "url": "https://elsewhere.example", "category": "Video" },
        { "name": "", "url": "", "category": "Video" },
    ])
    .to_string();

    let outcome = store.import_text(&text, &ImportOptions::default(), None).unwrap();
    assert_eq!(outcome.stats.added, 1);
    assert_eq!(outcome.stats.duplicates, 1);
    assert_eq!(outcome.stats.rejected, 1);

    let tools = store.current();
    assert_eq!(tools.len(), 13);
    assert_eq!(tools[0].name, "New One");
    assert_eq!(tools[1].name, "ChatGPT");
    assert_eq!(store.origin(), LoadOrigin::Override);
}

#[test]
fn imported_ids_stay_unique_and_editable() {
    let store = CatalogStore::without_source(memory());
    let text = json!([
        { "id": 1, "name": "Zed", "url": "https://zed.dev", "category": "Coding" },
        { "id": "1", "name": "Helix", "url": "https://helix-editor.com", "category": "Coding" },
    ])
    .to_string();
    let outcome = store.import_text(&text, &ImportOptions::default(), None).unwrap();
    assert_eq!(outcome.stats.added, 2);

    let tools = store.current();
    let answering_to_one: Vec<&str> = tools
        .iter()
        .filter(|t| t.id.same_as(&ToolId::Int(1)))
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(answering_to_one, vec!["ChatGPT"]);

    // Every record can be reached by its own id.
    for tool in tools.iter() {
        let renamed = format!("{} (edited)", tool.name);
        let updated = store
            .update(
                &tool.id,
                ToolEdit {
                    name: Some(renamed.clone()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, renamed);
    }
}

#[test]
fn update_into_a_name_clash_still_saves() {
    let store = CatalogStore::without_source(memory());
    let updated = store
        .update(
            &ToolId::Int(1),
            ToolEdit {
                name: Some("Claude".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Claude");
    assert_eq!(store.current().iter().filter(|t| t.name == "Claude").count(), 2);
}

#[test]
fn import_with_nothing_new_saves_nothing() {
    let kv = memory();
    let store = CatalogStore::without_source(kv.clone());
    let text = store.export_json().unwrap();
    let outcome = store.import_text(&text, &ImportOptions::default(), None).unwrap();
    assert_eq!(outcome.stats.duplicates, 12);
    assert_eq!(kv.get(OVERRIDE_KEY).unwrap(), None);
}

#[test]
fn import_refuses_non_array() {
    let store = CatalogStore::without_source(memory());
    let err = store
        .import_text("{\"name\": \"x\"}", &ImportOptions::default(), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::Import(ImportError::NotAnArray)));
}

#[test]
fn import_file_checks_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tools.txt");
    std::fs::write(&path, "[]").unwrap();
    let store = CatalogStore::without_source(memory());
    let err = store
        .import_file(&path, &ImportOptions::default(), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::Import(ImportError::InvalidFileType(_))));
}

#[test]
fn only_one_import_at_a_time() {
    let store = CatalogStore::without_source(memory());
    let guard = store.begin_import().unwrap();
    assert!(store.import_in_progress());
    assert!(matches!(store.begin_import(), Err(StoreError::ImportInProgress)));
    assert!(matches!(
        store.import_text("[]", &ImportOptions::default(), None),
        Err(StoreError::ImportInProgress)
    ));
    drop(guard);
    assert!(!store.import_in_progress());
    assert!(store.begin_import().is_ok());
}

#[test]
fn export_to_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(toolshelf_catalog::EXPORT_FILE_NAME);
    let store = CatalogStore::without_source(memory());
    assert_eq!(store.export_to(&path).unwrap(), 12);

    let fresh = CatalogStore::without_source(memory());
    fresh.replace(Vec::new()).unwrap();
    let outcome = fresh
        .import_file(&path, &ImportOptions::default(), None)
        .unwrap();
    assert_eq!(outcome.stats.added, 12);
    assert_eq!(&*fresh.current(), &*store.current());
}

// ── Notification ────────────────────────────────────────────────────────────

#[test]
fn other_store_reloads_on_override_change() {
    let kv = memory();
    let writer = CatalogStore::without_source(kv.clone());
    let reader = CatalogStore::without_source(kv.clone());
    assert_eq!(reader.current().len(), 12);

    let mut rx = reader.subscribe();
    writer.remove(&ToolId::Int(3)).unwrap();
    let event = rx.try_recv().unwrap();

    let reloaded = reader.reload_if_changed(&event).unwrap();
    assert_eq!(reloaded.len(), 11);
    assert_eq!(reader.current().len(), 11);

    let unrelated = ChangeEvent {
        key: "theme".into(),
        kind: ChangeKind::Set,
    };
    assert!(reader.reload_if_changed(&unrelated).is_none());
}
