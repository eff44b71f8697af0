use focusflow_core::storage::migrations::SCHEMA_VERSION;
use focusflow_core::{
    KeyValueStore, NewTask, NullSink, SqliteKvStore, StorageError, TaskStore, TASKS_STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn in_memory_store_is_at_current_schema_version() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    let version: u32 = store
        .connection()
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn save_overwrites_previous_value() {
    let mut store = SqliteKvStore::open_in_memory().unwrap();
    assert_eq!(store.load("k").unwrap(), None);

    store.save("k", "first").unwrap();
    store.save("k", "second").unwrap();

    assert_eq!(store.load("k").unwrap().as_deref(), Some("second"));
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusflow.sqlite3");

    let mut store = SqliteKvStore::open(&path).unwrap();
    store.save("focusflow_tasks", "[]").unwrap();
    drop(store);

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert_eq!(
        reopened.load("focusflow_tasks").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteKvStore::open(&path) {
        Err(StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

#[test]
fn task_store_round_trips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusflow.sqlite3");

    let mut store = TaskStore::new(SqliteKvStore::open(&path).unwrap(), NullSink);
    store.init();
    let kept = store.create(NewTask::new("Meditar", "Saúde")).unwrap();
    let dropped = store.create(NewTask::new("Rascunho", "Trabalho")).unwrap();
    store.toggle(kept.id);
    store.delete(dropped.id);
    let expected = store.list().to_vec();
    drop(store);

    let mut reloaded = TaskStore::new(SqliteKvStore::open(&path).unwrap(), NullSink);
    reloaded.init();

    assert_eq!(reloaded.list(), expected.as_slice());
    assert!(reloaded.get(kept.id).unwrap().completed);
    assert!(reloaded
        .storage()
        .load(TASKS_STORAGE_KEY)
        .unwrap()
        .is_some());
}
