//! Schema for the SQLite key-value store.
//!
//! The store holds one table, `kv_entries`, keyed by storage key with the
//! serialized value and the epoch-millisecond time of the last write. The
//! schema revision lives in `PRAGMA user_version`; a file written by a newer
//! build is refused rather than read with the wrong layout.

use crate::storage::{StorageError, StorageResult};
use rusqlite::Connection;

/// Ordered `(revision, DDL)` steps; a step runs when the file is below its revision.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Schema revision this build writes and reads.
pub const SCHEMA_VERSION: u32 = 1;

/// Brings the `kv_entries` schema up to [`SCHEMA_VERSION`].
///
/// # Errors
/// - `StorageError::UnsupportedSchemaVersion` when the file is newer.
/// - `StorageError::Sqlite` when a DDL step fails; no step is kept then.
pub fn ensure_schema(conn: &mut Connection) -> StorageResult<()> {
    let on_disk = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if on_disk > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|(revision, _)| *revision > on_disk)
        .collect();
    let Some((last_revision, _)) = pending.last() else {
        return Ok(());
    };

    let tx = conn.transaction()?;
    for (_, ddl) in &pending {
        tx.execute_batch(ddl)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {last_revision};"))?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, SCHEMA_STEPS, SCHEMA_VERSION};
    use rusqlite::Connection;

    #[test]
    fn last_step_matches_schema_version() {
        assert_eq!(SCHEMA_STEPS.last().map(|(revision, _)| *revision), Some(SCHEMA_VERSION));
    }

    #[test]
    fn ensure_schema_is_repeatable() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        ensure_schema(&mut conn).expect("first run");
        ensure_schema(&mut conn).expect("second run is a no-op");

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries';",
                [],
                |row| row.get(0),
            )
            .expect("sqlite_master query");
        assert_eq!(tables, 1);
    }
}
