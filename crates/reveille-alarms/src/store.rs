use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::debug;

use crate::db::init_db;
use crate::error::{AlarmError, Result};
use crate::types::{Alarm, AlarmSpec, AlarmTime};

/// Minimal persistence gateway over the `alarms` table.
///
/// Exists only so records survive process restarts; the read path
/// (`AlarmService::list`) is served from the scheduler, not from here.
/// Clones share one mutex-guarded connection.
#[derive(Clone)]
pub struct AlarmStore {
    conn: Arc<Mutex<Connection>>,
}

impl AlarmStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn insert(&self, alarm: &Alarm) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO alarms (id, hour, minute, repeat, days) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                alarm.id,
                alarm.time.hour,
                alarm.time.minute,
                alarm.repeat,
                alarm.days.join(",")
            ],
        )?;
        debug!(alarm_id = %alarm.id, "alarm row inserted");
        Ok(())
    }

    /// Delete one row. Returns `NotFound` when no row matched.
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM alarms WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(AlarmError::NotFound { id: id.to_string() });
        }
        debug!(alarm_id = %id, "alarm row deleted");
        Ok(())
    }

    /// Read every persisted record. A row that fails to scan propagates as an
    /// error rather than being skipped — restore treats that as fatal.
    pub fn list(&self) -> Result<Vec<(String, AlarmSpec)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, hour, minute, repeat, days FROM alarms")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, u8>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .map(|(id, hour, minute, repeat, days)| {
                let days: Vec<String> = if days.is_empty() {
                    Vec::new()
                } else {
                    days.split(',').map(str::to_string).collect()
                };
                (
                    id,
                    AlarmSpec {
                        time: AlarmTime { hour, minute },
                        repeat,
                        days,
                    },
                )
            })
            .collect())
    }
}
