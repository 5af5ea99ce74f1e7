use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Hour/minute outside the 00:00–23:59 range.
    #[error("Invalid time of day: {hour}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    /// No job with the given ID exists in the set.
    #[error("Job not found: {id}")]
    JobNotFound { id: String },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
