use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::db::init_db;
use crate::error::Result;

/// Playlist id random wakeup tracks are drawn from.
pub const DEFAULT_PLAYLIST_KEY: &str = "default_playlist";
/// One-shot track override, consumed and cleared after one wakeup run.
pub const NEXT_WAKEUP_TRACK_KEY: &str = "next_wakeup_track";

/// Key-value configuration for the player, upserted by key.
#[derive(Clone)]
pub struct PlayerConfigStore {
    conn: Arc<Mutex<Connection>>,
}

impl PlayerConfigStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM player_config WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO player_config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        debug!(key, "player config set");
        Ok(())
    }

    /// Delete a key. Absent keys are fine — clearing is idempotent.
    pub fn clear(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM player_config WHERE key = ?1", [key])?;
        debug!(key, "player config cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PlayerConfigStore {
        PlayerConfigStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn get_missing_key_is_none() {
        assert_eq!(store().get(DEFAULT_PLAYLIST_KEY).unwrap(), None);
    }

    #[test]
    fn set_upserts_by_key() {
        let store = store();
        store.set(DEFAULT_PLAYLIST_KEY, "pl-1").unwrap();
        store.set(DEFAULT_PLAYLIST_KEY, "pl-2").unwrap();
        assert_eq!(
            store.get(DEFAULT_PLAYLIST_KEY).unwrap(),
            Some("pl-2".to_string())
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let store = store();
        store.set(NEXT_WAKEUP_TRACK_KEY, "t-1").unwrap();
        store.clear(NEXT_WAKEUP_TRACK_KEY).unwrap();
        store.clear(NEXT_WAKEUP_TRACK_KEY).unwrap();
        assert_eq!(store.get(NEXT_WAKEUP_TRACK_KEY).unwrap(), None);
    }
}
