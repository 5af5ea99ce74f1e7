use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlarmError {
    /// The submitted alarm is malformed (bad time of day, unknown weekday,
    /// repeating alarm with no days). Client error, never retried.
    #[error("Invalid alarm: {0}")]
    InvalidAlarm(String),

    /// No alarm with the given id exists.
    #[error("Alarm not found: {id}")]
    NotFound { id: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] reveille_scheduler::SchedulerError),

    /// Delete could not complete and compensation failed too; the scheduler
    /// and the store disagree about this alarm.
    #[error("Alarm {id} left inconsistent: {detail}")]
    Inconsistent { id: String, detail: String },
}

pub type Result<T> = std::result::Result<T, AlarmError>;
