use std::sync::Arc;

use toolshelf_catalog::ToolId;
use toolshelf_store::*;

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        store.set("tools_override", "[1,2,3]").unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.get("tools_override").unwrap().as_deref(), Some("[1,2,3]"));
    assert!(dir.path().join("tools_override.json").exists());
}

#[test]
fn remove_missing_key_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let mut rx = store.subscribe();
    store.remove("absent").unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn poll_reports_writes_from_another_handle() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FileStore::open(dir.path()).unwrap();
    let watcher = FileStore::open(dir.path()).unwrap();
    let mut rx = watcher.subscribe();

    writer.set("tools_override", "[]").unwrap();
    let changes = watcher.poll().unwrap();
    assert_eq!(
        changes,
        vec![ChangeEvent {
            key: "tools_override".into(),
            kind: ChangeKind::Set,
        }]
    );
    assert_eq!(rx.try_recv().unwrap().key, "tools_override");

    // Nothing new since the last poll.
    assert!(watcher.poll().unwrap().is_empty());

    writer.set("tools_override", "[{\"name\":\"longer\"}]").unwrap();
    assert_eq!(watcher.poll().unwrap().len(), 1);

    writer.remove("tools_override").unwrap();
    let changes = watcher.poll().unwrap();
    assert_eq!(changes[0].kind, ChangeKind::Removed);
}

#[test]
fn catalog_over_file_store_follows_other_process() {
    let dir = tempfile::tempdir().unwrap();
    let (admin, _) = open_store(dir.path().join("store"), "missing.json").unwrap();
    let (viewer, viewer_kv) = open_store(dir.path().join("store"), "missing.json").unwrap();
    assert_eq!(viewer.current().len(), 12);

    admin.remove(&ToolId::Int(5)).unwrap();
    for event in viewer_kv.poll().unwrap() {
        viewer.reload_if_changed(&event);
    }
    assert_eq!(viewer.current().len(), 11);
    assert!(viewer.current().iter().all(|t| t.name != "Runway"));
}

#[test]
fn file_store_works_behind_trait_object() {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    kv.set("a", "1").unwrap();
    assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(kv.get("b").unwrap(), None);
}
