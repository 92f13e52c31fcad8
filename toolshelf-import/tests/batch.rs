use std::cell::RefCell;

use serde_json::{Value, json};
use tokio::sync::mpsc;
use toolshelf_catalog::{Tool, ToolId, normalize_all, parse_tool_array};
use toolshelf_import::*;

fn existing() -> Vec<Tool> {
    normalize_all(&[
        json!({ "id": 1, "name": "A", "url": "https://a.com", "category": "Coding" }),
        json!({ "id": 2, "name": "B", "url": "https://b.com", "category": "Image" }),
    ])
}

fn names(tools: &[Tool]) -> Vec<&str> {
    tools.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn imports_are_prepended_as_a_block() {
    let candidates = json!([
        { "id": 3, "name": "C", "url": "https://c.com", "category": "Video" },
        { "id": 4, "name": "D", "url": "https://d.com", "category": "Video" },
    ]);
    let outcome = import_batch(&candidates, &existing(), &ImportOptions::default(), None).unwrap();
    assert_eq!(names(&outcome.collection), vec!["C", "D", "A", "B"]);
    assert_eq!(names(&outcome.accepted), vec!["C", "D"]);
    assert_eq!(outcome.stats.added, 2);
    assert_eq!(outcome.stats.duplicates, 0);
}

#[test]
fn duplicates_within_a_batch_are_caught_regardless_of_chunking() {
    let candidates = vec![
        json!({ "name": "Tabnine", "url": "https://www.tabnine.com/", "category": "Coding" }),
        json!({ "name": "Tabnine Pro", "url": "https://www.tabnine.com#pricing", "category": "Coding" }),
    ];
    for batch_size in [1, 500] {
        let options = ImportOptions::default().batch_size(batch_size);
        let outcome = import_records(candidates.clone(), Vec::new(), &options, None);
        assert_eq!(outcome.accepted.len(), 1, "batch size {batch_size}");
        assert_eq!(outcome.duplicates.len(), 1, "batch size {batch_size}");
        assert_eq!(outcome.accepted[0].name, "Tabnine");
        assert_eq!(outcome.duplicates[0].name, "Tabnine Pro");
    }
}

#[test]
fn name_clash_with_existing_is_a_duplicate() {
    let candidates = vec![json!({ "name": "a", "url": "https://elsewhere.com", "category": "Coding" })];
    let outcome = import_records(candidates, existing(), &ImportOptions::default(), None);
    assert_eq!(outcome.stats.duplicates, 1);
    assert_eq!(outcome.collection.len(), 2);
}

#[test]
fn clashing_ids_are_replaced_on_import() {
    let candidates = vec![
        json!({ "id": 1, "name": "Zed", "url": "https://zed.dev", "category": "Coding" }),
        json!({ "id": "1", "name": "Helix", "url": "https://helix-editor.com", "category": "Coding" }),
        json!({ "id": "x", "name": "Kakoune", "url": "https://kakoune.org", "category": "Coding" }),
        json!({ "id": "x", "name": "Vim", "url": "https://vim.org", "category": "Coding" }),
    ];
    for batch_size in [1, 500] {
        let options = ImportOptions::default().batch_size(batch_size);
        let outcome = import_records(candidates.clone(), existing(), &options, None);
        assert_eq!(outcome.stats.added, 4, "batch size {batch_size}");

        let collection = &outcome.collection;
        for (i, a) in collection.iter().enumerate() {
            for b in &collection[i + 1..] {
                assert!(
                    !a.id.same_as(&b.id),
                    "'{}' and '{}' share id {} (batch size {batch_size})",
                    a.name,
                    b.name,
                    a.id
                );
            }
        }

        // The existing record and the first use of a free id keep theirs.
        let by_name = |name: &str| collection.iter().find(|t| t.name == name).unwrap();
        assert_eq!(by_name("A").id, ToolId::Int(1));
        assert_eq!(by_name("Kakoune").id, ToolId::Text("x".into()));
    }
}

#[test]
fn url_fallback_rescues_blank_name() {
    let candidates = vec![json!({ "name": "", "url": "https://x.com", "category": "Coding" })];
    let outcome = import_records(candidates, Vec::new(), &ImportOptions::default(), None);
    assert_eq!(outcome.stats.rejected, 0);
    assert_eq!(outcome.accepted[0].name, "x");
}

#[test]
fn unusable_url_is_rejected() {
    let candidates = vec![
        json!({ "name": "", "url": "", "category": "Coding" }),
        json!({ "name": "", "url": "not a url", "category": "Coding" }),
        json!({ "name": "Named", "url": "nope", "category": "Coding" }),
        json!("not even an object"),
    ];
    let outcome = import_records(candidates.clone(), Vec::new(), &ImportOptions::default(), None);
    assert_eq!(outcome.stats.rejected, 4);
    assert!(outcome.accepted.is_empty());
    // Rejected records are reported in their raw form.
    assert_eq!(outcome.rejected, candidates);
}

#[test]
fn semantically_odd_url_is_still_accepted() {
    let candidates = vec![json!({ "name": "Odd", "url": "ftp://files.example/x", "category": "Other" })];
    let outcome = import_records(candidates, Vec::new(), &ImportOptions::default(), None);
    assert_eq!(outcome.stats.added, 1);
}

#[test]
fn non_array_payload_is_a_hard_failure() {
    let err = import_batch(&json!({ "name": "x" }), &[], &ImportOptions::default(), None)
        .unwrap_err();
    assert!(matches!(err, ImportError::NotAnArray));
}

#[test]
fn ticks_follow_batch_size() {
    let candidates: Vec<Value> = (0..1201)
        .map(|i| json!({ "name": format!("T{i}"), "url": format!("https://t{i}.com"), "category": "Coding" }))
        .collect();
    let mut importer = BatchImporter::new(candidates, Vec::new(), &ImportOptions::default());
    let ticks: Vec<ImportTick> = importer.by_ref().collect();
    assert_eq!(
        ticks.iter().map(|t| t.processed).collect::<Vec<_>>(),
        vec![500, 1000, 1201]
    );
    assert!(ticks.iter().all(|t| t.total == 1201));
    assert_eq!(importer.finish().stats.added, 1201);
}

#[test]
fn finish_without_iterating_classifies_everything() {
    let candidates = vec![json!({ "name": "C", "url": "https://c.com", "category": "Video" })];
    let importer = BatchImporter::new(candidates, existing(), &ImportOptions::default());
    let outcome = importer.finish();
    assert_eq!(names(&outcome.collection), vec!["C", "A", "B"]);
}

struct Recorder(RefCell<Vec<(usize, usize)>>);

impl ImportProgress for Recorder {
    fn on_batch(&self, processed: usize, total: usize) {
        self.0.borrow_mut().push((processed, total));
    }
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

#[test]
fn progress_receives_each_chunk() {
    let candidates = vec![
        json!({ "name": "C", "url": "https://c.com", "category": "Video" }),
        json!({ "name": "D", "url": "https://d.com", "category": "Video" }),
        json!({ "name": "E", "url": "https://e.com", "category": "Video" }),
    ];
    let recorder = Recorder(RefCell::new(Vec::new()));
    let options = ImportOptions::default().batch_size(2);
    import_records(candidates, Vec::new(), &options, Some(&recorder));
    assert_eq!(*recorder.0.borrow(), vec![(2, 3), (3, 3)]);
}

#[test]
fn export_and_reimport_round_trip() {
    let tools = existing();
    let text = toolshelf_catalog::export_json(&tools).unwrap();
    let back = normalize_all(&parse_tool_array(&text).unwrap());
    assert_eq!(back, tools);

    // Re-importing the export into itself adds nothing.
    let outcome = import_records(parse_tool_array(&text).unwrap(), tools.clone(), &ImportOptions::default(), None);
    assert_eq!(outcome.stats.duplicates, 2);
    assert_eq!(outcome.collection, tools);
}

#[tokio::test]
async fn async_import_reports_events_and_matches_sync() {
    let candidates = vec![
        json!({ "name": "C", "url": "https://c.com", "category": "Video" }),
        json!({ "name": "C", "url": "https://c2.com", "category": "Video" }),
        json!({ "name": "", "url": "", "category": "Video" }),
    ];
    let options = ImportOptions::default().batch_size(1);
    let (tx, rx) = mpsc::unbounded_channel();
    let mut events = Vec::new();

    let outcome = run_with_events(
        import_records_async(candidates.clone(), existing(), options, tx),
        rx,
        |e| events.push(e),
    )
    .await;

    let sync = import_records(candidates, existing(), &options, None);
    assert_eq!(outcome.stats, sync.stats);
    assert_eq!(outcome.collection, sync.collection);

    assert_eq!(events.first(), Some(&ImportEvent::Started { total: 3 }));
    assert_eq!(
        events.last(),
        Some(&ImportEvent::Finished(ImportStats {
            total: 3,
            added: 1,
            duplicates: 1,
            rejected: 1,
        }))
    );
    let batches = events
        .iter()
        .filter(|e| matches!(e, ImportEvent::Batch { .. }))
        .count();
    assert_eq!(batches, 3);
}
