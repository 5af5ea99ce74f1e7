use rusqlite::Connection;

use crate::error::Result;

/// Initialise the player configuration schema in `conn`. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS player_config (
            key   TEXT NOT NULL PRIMARY KEY,
            value TEXT NOT NULL
        ) STRICT;
        ",
    )?;
    Ok(())
}
