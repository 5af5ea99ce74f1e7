use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;

use reveille_core::config::CalendarConfig;

use crate::error::{Result, SpeechError};
use crate::plugins::ContentPlugin;

/// Today's agenda as one sentence.
pub struct CalendarPlugin {
    client: reqwest::Client,
    config: CalendarConfig,
}

impl CalendarPlugin {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CalendarEvent {
    summary: String,
    /// Absent for all-day events.
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
}

/// All-day events first, then timed events in start order.
fn agenda_sentence(mut events: Vec<CalendarEvent>) -> String {
    if events.is_empty() {
        return "There are no calendar events today. ".to_string();
    }

    events.sort_by_key(|e| e.start_time);

    let mut sentence = "Here are the upcoming calendar events for today. ".to_string();
    for event in events {
        sentence.push_str(&event.summary);
        if let Some(start) = event.start_time {
            sentence.push_str(&format!(" at {:02}:{:02}", start.hour(), start.minute()));
        }
        sentence.push_str(". ");
    }
    sentence
}

#[async_trait]
impl ContentPlugin for CalendarPlugin {
    fn name(&self) -> &str {
        "calendar"
    }

    async fn text(&self) -> Result<String> {
        let now = Utc::now();
        let end_of_day = now
            .date_naive()
            .and_hms_opt(23, 59, 59)
            .map(|t| t.and_utc())
            .unwrap_or(now);

        let resp = self
            .client
            .get(format!("{}/events", self.config.base_url))
            .bearer_auth(&self.config.token)
            .query(&[
                ("time_min", now.to_rfc3339()),
                ("time_max", end_of_day.to_rfc3339()),
                ("calendars", self.config.calendars.join(",")),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SpeechError::Api {
                status: resp.status().as_u16(),
            });
        }

        let events: Vec<CalendarEvent> = resp.json().await?;
        Ok(agenda_sentence(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timed(summary: &str, hour: u32, minute: u32) -> CalendarEvent {
        CalendarEvent {
            summary: summary.to_string(),
            start_time: Some(Utc.with_ymd_and_hms(2026, 8, 4, hour, minute, 0).unwrap()),
        }
    }

    fn all_day(summary: &str) -> CalendarEvent {
        CalendarEvent {
            summary: summary.to_string(),
            start_time: None,
        }
    }

    #[test]
    fn empty_day_has_its_own_sentence() {
        assert_eq!(
            agenda_sentence(Vec::new()),
            "There are no calendar events today. "
        );
    }

    #[test]
    fn all_day_events_lead_then_timed_in_order() {
        let sentence = agenda_sentence(vec![
            timed("Standup", 9, 30),
            all_day("Moving day"),
            timed("Dentist", 8, 0),
        ]);
        assert_eq!(
            sentence,
            "Here are the upcoming calendar events for today. \
             Moving day. Dentist at 08:00. Standup at 09:30. "
        );
    }
}
