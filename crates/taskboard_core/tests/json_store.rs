use serde_json::{json, Value};
use std::fs;
use taskboard_core::{CollectionStore, JsonFileStore, StoreError};

fn sample_tasks() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Test Task 1",
            "description": "First test task",
            "category": "work",
            "status": "pending",
            "assignedTo": "user1",
            "createdAt": "2026-01-05T09:30:00.000Z"
        }),
        json!({
            "id": 2,
            "title": "Test Task 2",
            "description": "",
            "category": "personal",
            "status": "completed",
            "assignedTo": null,
            "createdAt": "2026-01-06T10:00:00.000Z"
        }),
    ]
}

fn temp_files(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    assert!(store.load("tasks").unwrap().is_empty());
}

#[test]
fn save_then_load_roundtrips_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let records = sample_tasks();

    store.save("tasks", &records).unwrap();
    assert_eq!(store.load("tasks").unwrap(), records);
}

#[test]
fn empty_collection_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save("users", &[]).unwrap();
    assert!(store.load("users").unwrap().is_empty());
}

#[test]
fn loading_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.save("tasks", &sample_tasks()).unwrap();

    let first = store.load("tasks").unwrap();
    let second = store.load("tasks").unwrap();
    assert_eq!(first, second);
}

#[test]
fn saved_file_is_pretty_printed_with_last_modified() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.save("tasks", &sample_tasks()).unwrap();

    let path = store.collection_path("tasks").unwrap();
    assert_eq!(path, dir.path().join("tasks.json"));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains('\n'));

    let document: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(document["tasks"].as_array().unwrap().len(), 2);
    let stamp = document["lastModified"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[test]
fn save_creates_missing_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("data");
    let store = JsonFileStore::new(&nested);

    store.save("users", &[json!({"id": "user1"})]).unwrap();
    store.save("users", &[]).unwrap();

    assert!(nested.join("users.json").is_file());
}

#[test]
fn collections_use_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save("tasks", &sample_tasks()).unwrap();
    store
        .save("users", &[json!({"id": "user1", "name": "A", "email": "a@x.com"})])
        .unwrap();

    assert_eq!(store.load("tasks").unwrap().len(), 2);
    assert_eq!(store.load("users").unwrap().len(), 1);
}

#[test]
fn malformed_content_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let path = dir.path().join("tasks.json");

    for content in [
        "{ not json",
        "[]",
        r#"{"users": []}"#,
        r#"{"tasks": "nope"}"#,
    ] {
        fs::write(&path, content).unwrap();
        assert!(
            store.load("tasks").unwrap().is_empty(),
            "content should load empty: {content}"
        );
    }

    fs::write(&path, [0xff_u8, 0xfe, 0x00]).unwrap();
    assert!(store.load("tasks").unwrap().is_empty());
}

#[test]
fn interrupted_write_leaves_previous_file_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let records = sample_tasks();
    store.save("tasks", &records).unwrap();

    // A crash between temp write and rename leaves a truncated sibling.
    fs::write(
        dir.path().join(".tasks.json.0123456789abcdef.tmp"),
        r#"{"tasks": [{"id": 3, "tit"#,
    )
    .unwrap();

    assert_eq!(store.load("tasks").unwrap(), records);
}

#[test]
fn successful_save_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save("tasks", &sample_tasks()).unwrap();
    store.save("tasks", &[]).unwrap();

    assert!(temp_files(dir.path()).is_empty());
}

#[test]
fn failed_rename_surfaces_error_and_cleans_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    // A directory at the target path makes the rename fail.
    fs::create_dir(dir.path().join("tasks.json")).unwrap();

    let err = store.save("tasks", &sample_tasks()).unwrap_err();

    assert!(matches!(err, StoreError::Rename { .. }), "got {err}");
    assert!(temp_files(dir.path()).is_empty());
}

#[test]
fn unreadable_target_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    fs::create_dir(dir.path().join("tasks.json")).unwrap();

    let err = store.load("tasks").unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "got {err}");
}

#[test]
fn data_dir_blocked_by_file_is_a_create_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("data");
    fs::write(&blocker, "not a directory").unwrap();
    let store = JsonFileStore::new(&blocker);

    let err = store.save("tasks", &[]).unwrap_err();
    assert!(matches!(err, StoreError::CreateDir { .. }), "got {err}");
}

#[test]
fn invalid_collection_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    assert!(matches!(
        store.load("../escape").unwrap_err(),
        StoreError::InvalidCollection(_)
    ));
    assert!(matches!(
        store.save("", &[]).unwrap_err(),
        StoreError::InvalidCollection(_)
    ));
}
