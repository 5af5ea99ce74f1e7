use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::types::Cadence;

/// Compute the next UTC fire time for `cadence` strictly *after* `from`.
///
/// Returns `None` only when the hour/minute cannot form a valid timestamp,
/// which the engine rules out up front by validating the time of day.
pub fn next_fire(cadence: &Cadence, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match cadence {
        Cadence::Daily { hour, minute } => {
            // Build today's candidate at HH:MM:00 UTC.
            let candidate = Utc
                .with_ymd_and_hms(
                    from.year(),
                    from.month(),
                    from.day(),
                    *hour as u32,
                    *minute as u32,
                    0,
                )
                .single()?;
            if candidate > from {
                Some(candidate)
            } else {
                // Today's window has passed — advance to tomorrow.
                Some(candidate + Duration::days(1))
            }
        }

        Cadence::Weekly { day, hour, minute } => {
            let today_dow = from.weekday().num_days_from_monday() as i64;
            let target_dow = day.num_days_from_monday() as i64;
            let days_ahead = (target_dow - today_dow).rem_euclid(7);

            let candidate_day = from + Duration::days(days_ahead);
            let candidate = Utc
                .with_ymd_and_hms(
                    candidate_day.year(),
                    candidate_day.month(),
                    candidate_day.day(),
                    *hour as u32,
                    *minute as u32,
                    0,
                )
                .single()?;

            if candidate > from {
                Some(candidate)
            } else {
                // The time on the target weekday has already passed — push 7 days.
                Some(candidate + Duration::days(7))
            }
        }

        Cadence::Interval { every_secs } => Some(from + Duration::seconds(*every_secs as i64)),
    }
}
