//! `reveille-alarms` — alarm records and their translation to scheduler jobs.
//!
//! An [`Alarm`](types::Alarm) is the user-visible entity (time of day, repeat
//! flag, weekday set). The [`AlarmService`](service::AlarmService) maps each
//! record onto one or more labelled jobs in the shared
//! [`Scheduler`](reveille_scheduler::Scheduler) — one daily job for a
//! one-shot alarm, one weekly job per weekday for a repeating one — and keeps
//! the SQLite row in [`AlarmStore`](store::AlarmStore) in step so records
//! survive restarts.

pub mod db;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::{AlarmError, Result};
pub use service::{AlarmService, WakeAction, KIND_ALARM, LABEL_ALARM_ID, LABEL_KIND};
pub use store::AlarmStore;
pub use types::{Alarm, AlarmSpec, AlarmTime};
