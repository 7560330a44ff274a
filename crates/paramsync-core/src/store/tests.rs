use super::*;
use std::fs;
use std::time::{Duration, SystemTime};

use paramsync_types::{ParamValue, StoreError};

#[test]
fn test_validate_key() {
    for key in ["/a", "/robot/arm/gain", "/robot_1/x-y"] {
        assert!(validate_key(key).is_ok(), "{} should be valid", key);
    }
    for key in ["", "/", "relative", "/a/", "/a//b", "/with space"] {
        assert_eq!(
            validate_key(key),
            Err(StoreError::InvalidKey { key: key.to_string() }),
            "{:?} should be invalid",
            key
        );
    }
}

#[test]
fn test_memory_store_set_get_list() {
    let store = MemoryStore::new();

    store.set("/b", ParamValue::Int(2)).unwrap();
    store.set("/a", ParamValue::Int(1)).unwrap();

    assert_eq!(store.list_keys().unwrap(), vec!["/a".to_string(), "/b".to_string()]);
    assert_eq!(store.get("/a").unwrap(), ParamValue::Int(1));
    assert_eq!(store.write_count(), 2);
}

#[test]
fn test_memory_store_rejects_invalid_key() {
    let store = MemoryStore::new();

    assert!(matches!(store.set("bad key", ParamValue::Bool(true)), Err(StoreError::InvalidKey { .. })));
    assert_eq!(store.write_count(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_memory_store_missing_key() {
    let store = MemoryStore::with_entries([("/a", ParamValue::Int(1))]);

    assert_eq!(store.get("/b"), Err(StoreError::NotFound { key: "/b".to_string() }));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("params.json")).unwrap();

    assert!(store.list_keys().unwrap().is_empty());
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("params.json");

    {
        let store = FileStore::open(&path).unwrap();
        store.set("/robot/gain", ParamValue::Double(0.25)).unwrap();
        store.set("/robot/name", ParamValue::from("arm")).unwrap();
    }

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.list_keys().unwrap().len(), 2);
    assert_eq!(reopened.get("/robot/gain").unwrap(), ParamValue::Double(0.25));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn test_file_store_picks_up_external_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    let store = FileStore::open(&path).unwrap();
    store.set("/a", ParamValue::Int(1)).unwrap();

    fs::write(&path, r#"{"/a":{"int":1},"/b":{"string":"added"}}"#).unwrap();
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();

    assert_eq!(store.list_keys().unwrap(), vec!["/a".to_string(), "/b".to_string()]);
    assert_eq!(store.get("/b").unwrap(), ParamValue::from("added"));
}

#[test]
fn test_file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt { .. })));
}

#[test]
fn test_file_store_rejects_invalid_key_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    let store = FileStore::open(&path).unwrap();

    assert!(store.set("nope", ParamValue::Int(1)).is_err());
    assert!(!path.exists());
}
