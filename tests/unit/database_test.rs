//! Unit tests for the QR Nexus database layer (connection, migrations, key-value store).

use std::sync::Arc;

use qrnexus::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use qrnexus::database::{Database, KeyValueStore};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_store() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection().unwrap();
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_get_missing_key_is_none() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get("scans").unwrap(), None);
}

#[test]
fn test_set_get_remove() {
    let db = Database::open_in_memory().unwrap();
    db.set("theme", "dark").unwrap();
    assert_eq!(db.get("theme").unwrap().as_deref(), Some("dark"));

    db.set("theme", "light").unwrap();
    assert_eq!(db.get("theme").unwrap().as_deref(), Some("light"));

    db.remove("theme").unwrap();
    assert_eq!(db.get("theme").unwrap(), None);
}

#[test]
fn test_arc_store_delegates() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    KeyValueStore::set(&db, "haptics", "false").unwrap();
    assert_eq!(db.get("haptics").unwrap().as_deref(), Some("false"));
}

#[test]
fn test_open_creates_parent_dirs_and_persists() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("dir").join("qrnexus.db");

    {
        let db = Database::open(&path).expect("open should create parent dirs");
        db.set("generated", "[]").unwrap();
    }

    let reopened = Database::open(&path).unwrap();
    assert_eq!(reopened.get("generated").unwrap().as_deref(), Some("[]"));
    let conn = reopened.connection().unwrap();
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}
