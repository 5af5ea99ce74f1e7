use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc, Weekday};
use tracing::{error, info, warn};

use crate::{
    error::{Result, SchedulerError},
    schedule::next_fire,
    types::{Cadence, JobAction, JobId, JobInfo},
};

struct Job {
    cadence: Cadence,
    labels: HashMap<String, String>,
    next_run: DateTime<Utc>,
    action: JobAction,
}

/// Shared handle to the in-memory job set.
///
/// Cloning is cheap; all clones see the same jobs. Structural mutation
/// (add/remove/label) and scans (`jobs`, `run_pending`'s due sweep) are
/// serialised by an internal mutex. The lock is never held while a job
/// action runs, so actions are free to mutate the set — one-shot jobs
/// remove themselves this way.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule a job to fire every day at the given UTC time.
    pub fn daily(&self, hour: u8, minute: u8, action: JobAction) -> Result<JobId> {
        self.insert(Cadence::Daily { hour, minute }, action)
    }

    /// Schedule a job to fire weekly on `day` at the given UTC time.
    pub fn weekly(&self, day: Weekday, hour: u8, minute: u8, action: JobAction) -> Result<JobId> {
        self.insert(Cadence::Weekly { day, hour, minute }, action)
    }

    /// Schedule a fixed-interval job. First fire is one interval from now.
    pub fn every(&self, every_secs: u64, action: JobAction) -> Result<JobId> {
        self.insert(Cadence::Interval { every_secs }, action)
    }

    fn insert(&self, cadence: Cadence, action: JobAction) -> Result<JobId> {
        if let Cadence::Daily { hour, minute } | Cadence::Weekly { hour, minute, .. } = cadence {
            if hour > 23 || minute > 59 {
                return Err(SchedulerError::InvalidTime { hour, minute });
            }
        }
        // A valid time of day always yields a fire time.
        let next_run = next_fire(&cadence, Utc::now())
            .ok_or(SchedulerError::InvalidTime { hour: 0, minute: 0 })?;

        let id = JobId::new();
        let job = Job {
            cadence,
            labels: HashMap::new(),
            next_run,
            action,
        };
        self.inner.lock().unwrap().insert(id, job);
        info!(job_id = %id, next_run = %next_run, "job added");
        Ok(id)
    }

    /// Attach (or overwrite) one label pair on a job.
    pub fn label(&self, id: JobId, key: &str, value: &str) -> Result<()> {
        let mut jobs = self.inner.lock().unwrap();
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| SchedulerError::JobNotFound { id: id.to_string() })?;
        job.labels.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove a job. Returns `JobNotFound` if no such job exists.
    pub fn remove(&self, id: JobId) -> Result<()> {
        let removed = self.inner.lock().unwrap().remove(&id);
        if removed.is_none() {
            return Err(SchedulerError::JobNotFound { id: id.to_string() });
        }
        info!(job_id = %id, "job removed");
        Ok(())
    }

    /// Snapshot every job (without its action).
    pub fn jobs(&self) -> Vec<JobInfo> {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .map(|(id, job)| JobInfo {
                id: *id,
                cadence: job.cadence,
                labels: job.labels.clone(),
                next_run: job.next_run,
            })
            .collect()
    }

    /// Next fire time of one job, if it exists.
    pub fn next_fire(&self, id: JobId) -> Option<DateTime<Utc>> {
        self.inner.lock().unwrap().get(&id).map(|j| j.next_run)
    }

    /// Fire every job whose next-fire time has elapsed.
    ///
    /// Driven by an external timer loop on a fixed cadence. Actions run
    /// sequentially within the call, so a slow action delays detection of
    /// subsequently-due jobs; the driver must await the call before ticking
    /// again (the scan is not reentrant).
    pub async fn run_pending(&self) {
        self.run_due(Utc::now()).await
    }

    /// Fire every job whose next-fire time is at or before `cutoff`.
    ///
    /// Each fired job's next-fire time is advanced by its cadence *before*
    /// its action runs, and the set's lock is released while actions run.
    pub async fn run_due(&self, cutoff: DateTime<Utc>) {
        let now = Utc::now();
        let due: Vec<(JobId, JobAction)> = {
            let mut jobs = self.inner.lock().unwrap();
            jobs.iter_mut()
                .filter(|(_, job)| job.next_run <= cutoff)
                .filter_map(|(id, job)| match next_fire(&job.cadence, now) {
                    Some(next) => {
                        job.next_run = next;
                        Some((*id, Arc::clone(&job.action)))
                    }
                    None => {
                        warn!(job_id = %id, "job has no next fire time; skipping");
                        None
                    }
                })
                .collect()
        };

        for (id, action) in due {
            info!(job_id = %id, "executing job");
            if let Err(e) = action(id).await {
                error!(job_id = %id, "job action failed: {e}");
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_action(counter: Arc<AtomicUsize>) -> JobAction {
        Arc::new(move |_id| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    }

    #[tokio::test]
    async fn future_job_does_not_fire() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        scheduler
            .daily(7, 0, counting_action(Arc::clone(&fired)))
            .unwrap();

        scheduler.run_pending().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn due_job_fires_and_advances() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let id = scheduler
            .daily(7, 0, counting_action(Arc::clone(&fired)))
            .unwrap();
        let before = scheduler.next_fire(id).unwrap();

        scheduler.run_due(Utc::now() + chrono::Duration::days(2)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        // Job survives and has a future fire time.
        let after = scheduler.next_fire(id).unwrap();
        assert!(after > Utc::now());
        assert!(after <= before + chrono::Duration::days(1));
    }

    #[tokio::test]
    async fn action_can_remove_its_own_job() {
        let scheduler = Scheduler::new();
        let handle = scheduler.clone();
        let action: JobAction = Arc::new(move |id| {
            let handle = handle.clone();
            Box::pin(async move {
                handle.remove(id)?;
                Ok(())
            })
        });
        let id = scheduler.daily(7, 0, action).unwrap();

        scheduler.run_due(Utc::now() + chrono::Duration::days(2)).await;

        assert!(scheduler.next_fire(id).is_none());
        assert!(scheduler.jobs().is_empty());
    }

    #[tokio::test]
    async fn failing_action_is_logged_not_fatal() {
        let scheduler = Scheduler::new();
        let action: JobAction =
            Arc::new(|_id| Box::pin(async { Err("collaborator unavailable".into()) }));
        let id = scheduler.daily(7, 0, action).unwrap();

        scheduler.run_due(Utc::now() + chrono::Duration::days(2)).await;

        // Failure does not unschedule the job.
        assert!(scheduler.next_fire(id).is_some());
    }

    #[test]
    fn labels_are_independent_pairs() {
        let scheduler = Scheduler::new();
        let noop: JobAction = Arc::new(|_| Box::pin(async { Ok(()) }));
        let id = scheduler.daily(6, 30, noop).unwrap();
        scheduler.label(id, "alarm_id", "a-1").unwrap();
        scheduler.label(id, "kind", "alarm").unwrap();

        let jobs = scheduler.jobs();
        let info = jobs.iter().find(|j| j.id == id).unwrap();
        assert_eq!(info.label("alarm_id"), Some("a-1"));
        assert_eq!(info.label("kind"), Some("alarm"));
        assert_eq!(info.label("missing"), None);
    }

    #[test]
    fn invalid_time_is_rejected() {
        let scheduler = Scheduler::new();
        let noop: JobAction = Arc::new(|_| Box::pin(async { Ok(()) }));
        assert!(matches!(
            scheduler.daily(24, 0, noop.clone()),
            Err(SchedulerError::InvalidTime { .. })
        ));
        assert!(matches!(
            scheduler.weekly(Weekday::Mon, 7, 60, noop),
            Err(SchedulerError::InvalidTime { .. })
        ));
    }

    #[test]
    fn remove_unknown_job_errors() {
        let scheduler = Scheduler::new();
        let noop: JobAction = Arc::new(|_| Box::pin(async { Ok(()) }));
        let id = scheduler.daily(7, 0, noop).unwrap();
        scheduler.remove(id).unwrap();
        assert!(matches!(
            scheduler.remove(id),
            Err(SchedulerError::JobNotFound { .. })
        ));
    }
}
