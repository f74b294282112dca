use std::fs;
use std::sync::Arc;
use std::thread;

use culler_engine::{AtomicFileWriter, PersistError, ViewedSet};
use tempfile::TempDir;

#[test]
fn missing_file_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let viewed = ViewedSet::open(temp.path().join("viewed.json"));
    assert!(viewed.load().unwrap().is_empty());
    assert!(viewed.is_empty().unwrap());
}

#[test]
fn record_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewed.json");
    let viewed = ViewedSet::open(&path);

    assert!(viewed.record("x").unwrap());
    assert!(!viewed.record("x").unwrap());

    let stored: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored, vec!["x".to_string()]);
}

#[test]
fn reopening_returns_what_was_written() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state").join("viewed.json");

    let first = ViewedSet::open(&path);
    first.record("a").unwrap();
    first.record("b").unwrap();
    drop(first);

    let reopened = ViewedSet::open(&path);
    let ids = reopened.load().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("a") && ids.contains("b"));
    assert!(reopened.contains("b").unwrap());
    assert!(!reopened.contains("c").unwrap());
}

#[test]
fn keeps_insertion_order_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewed.json");
    fs::write(&path, r#"["z","y"]"#).unwrap();

    let viewed = ViewedSet::open(&path);
    viewed.record("a").unwrap();

    let stored: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored, vec!["z", "y", "a"]);
}

#[test]
fn corrupt_file_is_an_error_and_left_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewed.json");
    fs::write(&path, "[\"a\", ").unwrap();

    let viewed = ViewedSet::open(&path);
    assert!(matches!(viewed.load(), Err(PersistError::Corrupt { .. })));
    assert!(matches!(viewed.record("b"), Err(PersistError::Corrupt { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[\"a\", ");
}

#[test]
fn concurrent_records_are_not_lost() {
    let temp = TempDir::new().unwrap();
    let viewed = Arc::new(ViewedSet::open(temp.path().join("viewed.json")));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let viewed = viewed.clone();
            thread::spawn(move || {
                for n in 0..10 {
                    viewed.record(&format!("{worker}-{n}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(viewed.len().unwrap(), 80);
}

#[test]
fn atomic_writer_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("doc.json");
    let writer = AtomicFileWriter::new(target.clone());

    writer.write(b"hello").unwrap();
    writer.write(b"world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");

    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn atomic_writer_fails_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let writer = AtomicFileWriter::new(not_a_dir.join("doc.json"));
    assert!(matches!(writer.write(b"data"), Err(PersistError::StateDir(_))));
    assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "x");
}
