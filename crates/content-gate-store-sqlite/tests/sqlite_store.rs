// crates/content-gate-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Key-Value Store Tests
// Description: Persistence, typing, path safety, and schema versioning.
// Purpose: Validate that gate state survives reopen and fails closed on bad data.
// ============================================================================

//! ## Overview
//! Integration tests for the SQLite key-value store:
//! - Typed reads and writes, including kind isolation
//! - Persistence across reopen
//! - Path safety checks and schema version validation
//! - Corrupt flag detection and concurrent writers

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::Path;
use std::sync::Arc;
use std::thread;

use content_gate_core::KeyValueStore;
use content_gate_core::StoreError;
use content_gate_store_sqlite::SqliteKeyValueStore;
use content_gate_store_sqlite::SqliteStoreConfig;
use content_gate_store_sqlite::SqliteStoreError;
use content_gate_store_sqlite::SqliteStoreMode;
use content_gate_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn open(path: &Path) -> SqliteKeyValueStore {
    SqliteKeyValueStore::new(&SqliteStoreConfig::new(path)).unwrap()
}

// ============================================================================
// SECTION: Typed Entries
// ============================================================================

#[test]
fn missing_entries_read_as_absent() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("gate.db"));
    assert_eq!(store.get_string("content_gate.cached_url.x").unwrap(), None);
    assert!(!store.get_bool("content_gate.external_shown.x").unwrap());
}

#[test]
fn writes_overwrite_previous_values() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("gate.db"));
    store.set_string("url", "https://a.example/").unwrap();
    store.set_string("url", "https://b.example/").unwrap();
    store.set_bool("flag", true).unwrap();
    store.set_bool("flag", false).unwrap();
    assert_eq!(store.get_string("url").unwrap().as_deref(), Some("https://b.example/"));
    assert!(!store.get_bool("flag").unwrap());
}

#[test]
fn kinds_do_not_cross_read() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir.path().join("gate.db"));
    store.set_bool("flag", true).unwrap();
    store.set_string("text", "true").unwrap();
    assert_eq!(store.get_string("flag").unwrap(), None);
    assert!(!store.get_bool("text").unwrap());
}

#[test]
fn corrupt_flag_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gate.db");
    let store = open(&path);
    store.set_bool("flag", true).unwrap();
    drop(store);

    let raw = Connection::open(&path).unwrap();
    raw.execute("UPDATE kv_entries SET value = 'yes' WHERE key = 'flag'", []).unwrap();
    drop(raw);

    let store = open(&path);
    assert!(matches!(store.get_bool("flag"), Err(StoreError::Corrupt(_))));
}

// ============================================================================
// SECTION: Durability
// ============================================================================

#[test]
fn entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("gate.db");
    {
        let store = open(&path);
        store.set_bool("content_gate.external_shown.promo", true).unwrap();
        store.set_string("content_gate.cached_url.promo", "https://cdn.example.com/").unwrap();
    }
    let store = open(&path);
    assert!(store.get_bool("content_gate.external_shown.promo").unwrap());
    assert_eq!(
        store.get_string("content_gate.cached_url.promo").unwrap().as_deref(),
        Some("https://cdn.example.com/")
    );
}

#[test]
fn delete_journal_and_normal_sync_are_supported() {
    let dir = TempDir::new().unwrap();
    let config = SqliteStoreConfig {
        path: dir.path().join("gate.db"),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Delete,
        sync_mode: SqliteSyncMode::Normal,
    };
    let store = SqliteKeyValueStore::new(&config).unwrap();
    store.set_string("k", "v").unwrap();
    assert_eq!(store.get_string("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn concurrent_writers_are_serialized() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open(&dir.path().join("gate.db")));
    let handles: Vec<_> = (0 .. 8)
        .map(|index| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0 .. 20 {
                    store.set_string(&format!("key.{index}"), &format!("value.{round}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    for index in 0 .. 8 {
        let value = store.get_string(&format!("key.{index}")).unwrap();
        assert_eq!(value.as_deref(), Some("value.19"));
    }
}

// ============================================================================
// SECTION: Path Safety and Schema
// ============================================================================

#[test]
fn rejects_directory_and_empty_paths() {
    let dir = TempDir::new().unwrap();
    let as_dir = SqliteKeyValueStore::new(&SqliteStoreConfig::new(dir.path()));
    assert!(matches!(as_dir, Err(SqliteStoreError::Invalid(_))));

    let empty = SqliteKeyValueStore::new(&SqliteStoreConfig::new(""));
    assert!(matches!(empty, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn rejects_overlong_component() {
    let dir = TempDir::new().unwrap();
    let long_name = "a".repeat(256);
    let result = SqliteKeyValueStore::new(&SqliteStoreConfig::new(dir.path().join(long_name)));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn unknown_schema_version_fails_closed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gate.db");
    drop(open(&path));

    let raw = Connection::open(&path).unwrap();
    raw.execute("UPDATE store_meta SET version = 99", []).unwrap();
    drop(raw);

    let result = SqliteKeyValueStore::new(&SqliteStoreConfig::new(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
    assert!(matches!(
        StoreError::from(SqliteStoreError::VersionMismatch("v".to_string())),
        StoreError::VersionMismatch(_)
    ));
}
