use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, Result};

/// Wall-clock trigger time, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTime {
    pub hour: u8,
    pub minute: u8,
}

/// User-submitted alarm definition, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSpec {
    pub time: AlarmTime,
    #[serde(default)]
    pub repeat: bool,
    /// Lowercase weekday names; meaningful only when `repeat` is true.
    #[serde(default)]
    pub days: Vec<String>,
}

/// A fully materialised alarm record.
///
/// `next_run` is derived from the record's scheduler jobs (the minimum
/// next-fire time across them) and is recomputed whenever jobs are
/// (re)created; it is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub time: AlarmTime,
    pub repeat: bool,
    pub days: Vec<String>,
    pub next_run: DateTime<Utc>,
}

/// Parse a weekday name as submitted by clients ("monday", "Mon", …).
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    name.parse::<Weekday>()
        .map_err(|_| AlarmError::InvalidAlarm(format!("unknown weekday: {name}")))
}

/// Canonical lowercase name for a weekday, as stored and listed.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
