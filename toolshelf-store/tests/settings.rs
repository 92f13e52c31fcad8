use std::path::PathBuf;

use toolshelf_store::settings::*;

#[test]
fn resolution_prefers_cli_then_file_then_default() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");

    assert_eq!(resolve_store_dir_in(&settings, None), default_store_dir());
    assert_eq!(resolve_document_in(&settings, None), DEFAULT_DOCUMENT);

    save_setting_in(&settings, "store.dir", Some("/srv/toolshelf")).unwrap();
    save_setting_in(&settings, "source.document", Some("https://example.com/tools.json")).unwrap();
    assert_eq!(resolve_store_dir_in(&settings, None), PathBuf::from("/srv/toolshelf"));
    assert_eq!(resolve_document_in(&settings, None), "https://example.com/tools.json");

    assert_eq!(
        resolve_store_dir_in(&settings, Some(PathBuf::from("/tmp/override"))),
        PathBuf::from("/tmp/override")
    );
    assert_eq!(resolve_document_in(&settings, Some("local.json".into())), "local.json");
}

#[test]
fn save_preserves_unrelated_entries() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    std::fs::write(&settings, "[ui]\ntheme = \"dark\"\n").unwrap();

    save_setting_in(&settings, "store.dir", Some("/data")).unwrap();
    assert_eq!(read_setting(&settings, "ui", "theme").as_deref(), Some("dark"));
    assert_eq!(read_setting(&settings, "store", "dir").as_deref(), Some("/data"));

    save_setting_in(&settings, "store.dir", None).unwrap();
    assert_eq!(read_setting(&settings, "store", "dir"), None);
    assert_eq!(read_setting(&settings, "ui", "theme").as_deref(), Some("dark"));
}

#[test]
fn unknown_setting_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    let err = save_setting_in(&settings, "store.color", Some("blue")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(!settings.exists());
}
