//! SQLite-backed key-value store.
//!
//! # Invariants
//! - A returned store has the `kv_entries` schema at the current revision.
//! - Each key holds at most one row; `save` is an upsert.

use super::migrations::ensure_schema;
use super::{KeyValueStore, StorageResult};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Key-value store persisted in a single SQLite table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) a store file and brings its schema up to date.
    ///
    /// # Side effects
    /// - Emits `storage_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        open_with("file", || Connection::open(path))
    }

    /// Opens a throwaway store that lives as long as the returned value.
    pub fn open_in_memory() -> StorageResult<Self> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Borrows the underlying connection, mostly for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn open_with(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<SqliteKvStore> {
    let started_at = Instant::now();
    info!("event=storage_open module=storage status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=storage_open module=storage status=error mode={} duration_ms={} error_code=storage_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=storage_open module=storage status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(SqliteKvStore { conn })
        }
        Err(err) => {
            error!(
                "event=storage_open module=storage status=error mode={} duration_ms={} error_code=storage_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_schema(conn)?;
    Ok(())
}

impl KeyValueStore for SqliteKvStore {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        debug!(
            "event=storage_load module=storage status=ok key={} found={}",
            key,
            value.is_some()
        );
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        debug!(
            "event=storage_save module=storage status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
