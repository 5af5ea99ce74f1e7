use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc, Weekday};
use uuid::Uuid;

/// Defines when and how often a job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Run every day at the given hour and minute (UTC).
    Daily { hour: u8, minute: u8 },

    /// Run on a specific weekday at the given time (UTC).
    Weekly {
        day: Weekday,
        hour: u8,
        minute: u8,
    },

    /// Run repeatedly with a fixed interval in seconds.
    Interval { every_secs: u64 },
}

/// Opaque handle to a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Error type job actions may fail with. The engine logs failures; it never
/// retries them.
pub type JobError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by a job action.
pub type JobFuture = Pin<Box<dyn Future<Output = std::result::Result<(), JobError>> + Send>>;

/// A job's unit of work. Receives the job's own id so an action can
/// deregister the job it belongs to (one-shot semantics).
pub type JobAction = Arc<dyn Fn(JobId) -> JobFuture + Send + Sync>;

/// Snapshot of one scheduled job, without its action.
#[derive(Debug, Clone)]
pub struct JobInfo {
    pub id: JobId,
    pub cadence: Cadence,
    pub labels: HashMap<String, String>,
    pub next_run: DateTime<Utc>,
}

impl JobInfo {
    /// Exact-match label lookup.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}
