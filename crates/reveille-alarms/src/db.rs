use rusqlite::Connection;

use crate::error::Result;

/// Initialise the alarms schema in `conn`. Idempotent — safe on every start.
///
/// One row per alarm record (not per job); the scheduler re-derives the job
/// fan-out from `repeat`/`days` on restore.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS alarms (
            id      TEXT    NOT NULL PRIMARY KEY,
            hour    INTEGER NOT NULL,
            minute  INTEGER NOT NULL,
            repeat  INTEGER NOT NULL,
            days    TEXT    NOT NULL DEFAULT ''  -- comma-joined weekday names
        ) STRICT;
        ",
    )?;
    Ok(())
}
