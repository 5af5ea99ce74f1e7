//! `reveille-scheduler` — in-memory job engine for the wake-up service.
//!
//! # Overview
//!
//! Jobs live in an in-process set guarded by a mutex; the engine performs no
//! background waiting of its own. A driver loop calls
//! [`Scheduler::run_pending`] on a fixed cadence, which fires every job whose
//! next-fire time has elapsed, advancing it by its cadence first. Persistence
//! is the caller's concern: on restart, jobs are re-registered from whatever
//! store owns their source records.
//!
//! # Cadence variants
//!
//! | Variant    | Behaviour                                |
//! |------------|------------------------------------------|
//! | `Daily`    | Fire at HH:MM UTC every day              |
//! | `Weekly`   | Fire at HH:MM UTC on a specific weekday  |
//! | `Interval` | Repeat every N seconds                   |
//!
//! Each job carries a label map (string key → string value) used by callers
//! to group and filter jobs, e.g. tagging every job derived from one alarm
//! record with that record's id.

pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use engine::Scheduler;
pub use error::{Result, SchedulerError};
pub use types::{Cadence, JobAction, JobError, JobFuture, JobId, JobInfo};
