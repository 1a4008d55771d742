// crates/respond-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Response Store Tests
// Description: Persistence, transactions, and integrity for the SQLite store.
// Purpose: Validate path safety, schema versioning, rollback, and cascade.
// Dependencies: respond-core, respond-store-sqlite, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Integration tests for the `SQLite` response store:
//! - Path safety checks (empty/directory rejection)
//! - Schema version validation
//! - Rollback of uncommitted transactions
//! - Foreign key enforcement and trigger cascade
//! - Engine reload across reopen

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

use respond_core::Respond;
use respond_core::RespondError;
use respond_core::ResponseId;
use respond_core::ResponseStore;
use respond_core::ResponseUpdate;
use respond_core::Rule;
use respond_core::StoreError;
use respond_core::StoreTransaction;
use respond_core::Timestamp;
use respond_core::TriggerId;
use respond_store_sqlite::SqliteResponseStore;
use respond_store_sqlite::SqliteStoreConfig;
use respond_store_sqlite::SqliteStoreError;
use respond_store_sqlite::SqliteStoreMode;
use respond_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_at(path: &Path) -> SqliteResponseStore {
    SqliteResponseStore::new(SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    })
    .unwrap()
}

fn temp_store() -> (TempDir, SqliteResponseStore) {
    let dir = TempDir::new().unwrap();
    let store = store_at(&dir.path().join("respond.db"));
    (dir, store)
}

// ============================================================================
// SECTION: Path and Schema
// ============================================================================

#[test]
fn empty_path_is_rejected() {
    let err = SqliteResponseStore::new(SqliteStoreConfig::new("")).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn directory_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = SqliteResponseStore::new(SqliteStoreConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(message) if message.contains("directory")));
}

#[test]
fn overlong_component_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x".repeat(300));
    let err = SqliteResponseStore::new(SqliteStoreConfig::new(path)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/respond.db");
    let _store = store_at(&path);
    assert!(path.exists());
}

#[test]
fn schema_version_mismatch_fails_closed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("respond.db");
    drop(store_at(&path));
    let conn = Connection::open(&path).unwrap();
    conn.execute("UPDATE store_meta SET version = ?1", params![99]).unwrap();
    drop(conn);
    let err = SqliteResponseStore::new(SqliteStoreConfig::new(&path)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

#[test]
fn committed_rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("respond.db");
    {
        let store = store_at(&path);
        let mut tx = store.begin().unwrap();
        let response = tx.create_response("hello back", false, "alice").unwrap();
        tx.create_trigger(response.id, "hello", 1.0, "alice").unwrap();
        tx.create_trigger(response.id, "hi", 0.25, "alice").unwrap();
        tx.commit().unwrap();
    }
    let store = store_at(&path);
    let mut tx = store.begin().unwrap();
    let all = tx.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].response, "hello back");
    let triggers = all[0].triggers();
    assert_eq!(triggers.len(), 2);
    assert!((triggers[0].chance - 1.0).abs() < f64::EPSILON);
    assert!((triggers[1].chance - 0.25).abs() < f64::EPSILON);
}

#[test]
fn dropped_transaction_rolls_back() {
    let (_dir, store) = temp_store();
    {
        let mut tx = store.begin().unwrap();
        let response = tx.create_response("ghost", false, "alice").unwrap();
        tx.create_trigger(response.id, "boo", 0.5, "alice").unwrap();
    }
    let mut tx = store.begin().unwrap();
    assert!(tx.list_all().unwrap().is_empty());
    assert!(tx.list_triggers().unwrap().is_empty());
}

#[test]
fn validation_runs_before_insert() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let err = tx.create_response("", false, "").unwrap_err();
    let StoreError::Validation(error) = err else { panic!("expected validation error") };
    assert!(error.has_violation("response", Rule::Required));
    assert!(error.has_violation("created_by", Rule::Required));
}

#[test]
fn trigger_for_missing_response_violates_foreign_key() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let err = tx.create_trigger(ResponseId::new(42), "orphan", 0.5, "alice").unwrap_err();
    assert!(matches!(err, StoreError::Store(_)));
}

#[test]
fn fetch_missing_rows_is_not_found() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    assert!(matches!(
        tx.fetch_response(ResponseId::new(7), true).unwrap_err(),
        StoreError::NotFound { entity: "response", id: 7 }
    ));
    assert!(matches!(
        tx.fetch_trigger(TriggerId::new(8)).unwrap_err(),
        StoreError::NotFound { entity: "trigger", id: 8 }
    ));
}

#[test]
fn updates_of_missing_rows_report_no_rows_updated() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let update = ResponseUpdate { text: "x".to_string(), executable: None };
    assert!(matches!(
        tx.update_response(ResponseId::new(3), &update).unwrap_err(),
        StoreError::NoRowsUpdated { entity: "response", .. }
    ));
    assert!(matches!(
        tx.update_trigger(TriggerId::new(3), "x", Some(0.5)).unwrap_err(),
        StoreError::NoRowsUpdated { entity: "trigger", .. }
    ));
    assert!(matches!(
        tx.update_trigger(TriggerId::new(3), "x", None).unwrap_err(),
        StoreError::NotFound { entity: "trigger", .. }
    ));
}

#[test]
fn update_response_keeps_flag_unless_given() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let response = tx.create_response("date", true, "alice").unwrap();
    let update = ResponseUpdate { text: "date -u".to_string(), executable: None };
    let updated = tx.update_response(response.id, &update).unwrap();
    assert!(updated.executable);
    assert_eq!(updated.response, "date -u");
    let update = ResponseUpdate { text: "plain".to_string(), executable: Some(false) };
    assert!(!tx.update_response(response.id, &update).unwrap().executable);
}

#[test]
fn rows_are_stamped_with_wall_clock_millis() {
    let before = Timestamp::now();
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let response = tx.create_response("stamped", false, "alice").unwrap();
    let trigger = tx.create_trigger(response.id, "stamp", 0.5, "alice").unwrap();
    assert_eq!(response.created_at, response.updated_at);
    assert_eq!(trigger.created_at, trigger.updated_at);
    assert!(response.created_at >= before);

    let fetched = tx.fetch_response(response.id, true).unwrap();
    assert_eq!(fetched.created_at, response.created_at);
    assert_eq!(fetched.triggers()[0].created_at, trigger.created_at);

    let updated = tx.update_trigger(trigger.id, "stamped again", None).unwrap();
    assert_eq!(updated.created_at, trigger.created_at);
    assert!(updated.updated_at >= trigger.updated_at);
    assert!(updated.updated_at <= Timestamp::now());
}

#[test]
fn delete_trigger_cascades_only_for_sole_trigger() {
    let (_dir, store) = temp_store();
    let mut tx = store.begin().unwrap();
    let pair = tx.create_response("pair", false, "alice").unwrap();
    let first = tx.create_trigger(pair.id, "first", 0.5, "alice").unwrap();
    let second = tx.create_trigger(pair.id, "second", 0.5, "alice").unwrap();

    let removed = tx.delete_trigger(first.id).unwrap();
    assert!(removed.response.is_none());
    let removed = tx.delete_trigger(second.id).unwrap();
    assert_eq!(removed.response.unwrap().response, "pair");
    assert!(matches!(tx.fetch_response(pair.id, false), Err(StoreError::NotFound { .. })));
    tx.commit().unwrap();
}

// ============================================================================
// SECTION: Engine Integration
// ============================================================================

#[test]
fn engine_over_sqlite_keeps_cache_in_step() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("respond.db");
    let mut respond = Respond::load(store_at(&path)).unwrap();
    let added = respond.add(vec!["a", "b"], "c", 0.5, "user", false).unwrap();
    assert_eq!(added.triggers().len(), 2);
    let solo = respond.add("x", "y", 1.0, "bob", false).unwrap();
    assert_eq!(respond.try_emit("contains x here").unwrap()[0].response, "y");

    let removed = respond.remove_trigger(solo.triggers()[0].id).unwrap();
    assert_eq!(removed.response.unwrap().response, "y");
    assert_eq!(respond.cache().len(), 2);

    drop(respond);
    let reopened = Respond::load(store_at(&path)).unwrap();
    assert_eq!(reopened.cache().len(), 2);
    let all = reopened.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].response, "c");
}

#[test]
fn failed_add_leaves_database_untouched() {
    let (_dir, store) = temp_store();
    let mut respond = Respond::load(store).unwrap();
    let err = respond.add(vec!["ok", "  "], "c", 0.5, "user", false).unwrap_err();
    assert!(matches!(err, RespondError::Validation(_)));
    assert!(respond.get_all().unwrap().is_empty());
    assert!(respond.cache().is_empty());
}
