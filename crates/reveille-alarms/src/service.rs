use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use reveille_scheduler::{Cadence, JobAction, JobFuture, JobId, JobInfo, Scheduler};

use crate::error::{AlarmError, Result};
use crate::store::AlarmStore;
use crate::types::{parse_weekday, weekday_name, Alarm, AlarmSpec, AlarmTime};

/// Identity label: every job derived from an alarm carries its record's id.
pub const LABEL_ALARM_ID: &str = "alarm_id";
/// Type label key.
pub const LABEL_KIND: &str = "kind";
/// Type label value distinguishing alarm jobs from maintenance jobs sharing
/// the scheduler.
pub const KIND_ALARM: &str = "alarm";

/// The wakeup run, injected at wiring time. Invoked once per firing.
pub type WakeAction = Arc<dyn Fn() -> JobFuture + Send + Sync>;

/// Translates alarm records into labelled scheduler jobs and back.
///
/// One daily job for a one-shot alarm, one weekly job per weekday for a
/// repeating one. The store row only exists so records survive restarts;
/// `list` reads the scheduler, never the store.
#[derive(Clone)]
pub struct AlarmService {
    store: AlarmStore,
    scheduler: Scheduler,
    wake: WakeAction,
}

impl AlarmService {
    pub fn new(store: AlarmStore, scheduler: Scheduler, wake: WakeAction) -> Self {
        Self {
            store,
            scheduler,
            wake,
        }
    }

    /// Validate `spec`, register its jobs, persist the row, and return the
    /// full record. If the row insert fails the just-registered jobs are
    /// removed again and the whole operation fails.
    pub fn create(&self, spec: AlarmSpec) -> Result<Alarm> {
        let spec = validate(spec)?;
        let id = Uuid::new_v4().to_string();

        let next_run = self.register_jobs(&id, &spec)?;
        let alarm = Alarm {
            id: id.clone(),
            time: spec.time,
            repeat: spec.repeat,
            days: spec.days,
            next_run,
        };

        if let Err(e) = self.store.insert(&alarm) {
            self.remove_jobs(&id);
            return Err(e);
        }

        info!(alarm_id = %id, repeat = alarm.repeat, "alarm created");
        Ok(alarm)
    }

    /// Reconstruct every alarm record from the scheduler's job set.
    ///
    /// Jobs tagged `kind=alarm` are grouped by their `alarm_id` label; a
    /// single-job group reads back as non-repeating, a multi-job group as
    /// repeating with one day per job. Order is unspecified.
    pub fn list(&self) -> Result<Vec<Alarm>> {
        let mut groups: HashMap<String, Vec<JobInfo>> = HashMap::new();
        for info in self.scheduler.jobs() {
            if info.label(LABEL_KIND) != Some(KIND_ALARM) {
                continue;
            }
            let Some(alarm_id) = info.label(LABEL_ALARM_ID) else {
                warn!(job_id = %info.id, "alarm job without identity label");
                continue;
            };
            groups.entry(alarm_id.to_string()).or_default().push(info);
        }

        groups
            .into_iter()
            .map(|(id, jobs)| record_from_group(id, &jobs))
            .collect()
    }

    /// Remove an alarm: scheduler jobs first, then the store row.
    ///
    /// If the row delete fails after the jobs are gone, the jobs are
    /// re-registered from the removed group (compensating re-insertion) and
    /// the store error is surfaced, so the caller observes either a complete
    /// delete or no delete at all.
    pub fn delete(&self, id: &str) -> Result<()> {
        let group: Vec<JobInfo> = self
            .scheduler
            .jobs()
            .into_iter()
            .filter(|info| {
                info.label(LABEL_KIND) == Some(KIND_ALARM)
                    && info.label(LABEL_ALARM_ID) == Some(id)
            })
            .collect();

        if group.is_empty() {
            // No jobs to reconcile; a leftover row can still be cleared.
            return self.store.delete(id);
        }

        let record = record_from_group(id.to_string(), &group)?;
        for info in &group {
            if let Err(e) = self.scheduler.remove(info.id) {
                warn!(alarm_id = %id, job_id = %info.id, "job removal raced: {e}");
            }
        }

        match self.store.delete(id) {
            Ok(()) => {
                info!(alarm_id = %id, jobs = group.len(), "alarm deleted");
                Ok(())
            }
            Err(AlarmError::NotFound { .. }) => {
                // Jobs existed without a row (e.g. a one-shot that already
                // cleaned its row). The end state is what delete promises.
                info!(alarm_id = %id, "alarm deleted (row was already gone)");
                Ok(())
            }
            Err(e) => {
                let spec = AlarmSpec {
                    time: record.time,
                    repeat: record.repeat,
                    days: record.days,
                };
                match self.register_jobs(id, &spec) {
                    Ok(_) => Err(e),
                    Err(re) => Err(AlarmError::Inconsistent {
                        id: id.to_string(),
                        detail: format!(
                            "store delete failed ({e}) and jobs could not be re-registered: {re}"
                        ),
                    }),
                }
            }
        }
    }

    /// Re-materialise every stored record into scheduler jobs.
    ///
    /// Called once at startup, before the HTTP layer serves traffic. Rows are
    /// not re-inserted. Zero rows is fine; a row that fails to scan or
    /// validate aborts the restore.
    pub fn restore(&self) -> Result<()> {
        let rows = self.store.list()?;
        let count = rows.len();
        for (id, spec) in rows {
            let spec = validate(spec)?;
            self.register_jobs(&id, &spec)?;
        }
        info!(count, "alarms restored from store");
        Ok(())
    }

    /// Register the job fan-out for one record and return its `next_run`
    /// (the minimum next-fire time across the new jobs). On any failure the
    /// jobs registered so far are removed again.
    fn register_jobs(&self, id: &str, spec: &AlarmSpec) -> Result<DateTime<Utc>> {
        let mut job_ids: Vec<JobId> = Vec::new();
        match self.register_jobs_inner(id, spec, &mut job_ids) {
            Ok(next_run) => Ok(next_run),
            Err(e) => {
                for job_id in job_ids {
                    if let Err(cleanup) = self.scheduler.remove(job_id) {
                        warn!(alarm_id = %id, job_id = %job_id, "cleanup failed: {cleanup}");
                    }
                }
                Err(e)
            }
        }
    }

    fn register_jobs_inner(
        &self,
        id: &str,
        spec: &AlarmSpec,
        job_ids: &mut Vec<JobId>,
    ) -> Result<DateTime<Utc>> {
        if !spec.repeat {
            let action = self.one_shot_action(id.to_string());
            let job_id = self
                .scheduler
                .daily(spec.time.hour, spec.time.minute, action)?;
            job_ids.push(job_id);
            self.tag(job_id, id)?;
        } else {
            for day in &spec.days {
                let weekday = parse_weekday(day)?;
                let action = self.repeating_action();
                let job_id =
                    self.scheduler
                        .weekly(weekday, spec.time.hour, spec.time.minute, action)?;
                job_ids.push(job_id);
                self.tag(job_id, id)?;
            }
        }

        job_ids
            .iter()
            .filter_map(|job_id| self.scheduler.next_fire(*job_id))
            .min()
            .ok_or_else(|| AlarmError::InvalidAlarm("alarm produced no jobs".to_string()))
    }

    fn tag(&self, job_id: JobId, alarm_id: &str) -> Result<()> {
        self.scheduler.label(job_id, LABEL_ALARM_ID, alarm_id)?;
        self.scheduler.label(job_id, LABEL_KIND, KIND_ALARM)?;
        Ok(())
    }

    /// Action for a repeating alarm job: run the wakeup, stay scheduled.
    fn repeating_action(&self) -> JobAction {
        let wake = Arc::clone(&self.wake);
        Arc::new(move |_job_id| (wake)())
    }

    /// Action for a one-shot alarm job: run the wakeup, then consume the
    /// alarm — remove the job and delete the record's row — regardless of
    /// how the run went. The wakeup's own error still propagates.
    fn one_shot_action(&self, alarm_id: String) -> JobAction {
        let wake = Arc::clone(&self.wake);
        let scheduler = self.scheduler.clone();
        let store = self.store.clone();
        Arc::new(move |job_id| {
            let wake = Arc::clone(&wake);
            let scheduler = scheduler.clone();
            let store = store.clone();
            let alarm_id = alarm_id.clone();
            Box::pin(async move {
                let run_result = (wake)().await;
                if let Err(e) = scheduler.remove(job_id) {
                    warn!(alarm_id = %alarm_id, job_id = %job_id, "one-shot job removal failed: {e}");
                }
                if let Err(e) = store.delete(&alarm_id) {
                    warn!(alarm_id = %alarm_id, "one-shot row cleanup failed: {e}");
                }
                run_result
            })
        })
    }

    fn remove_jobs(&self, alarm_id: &str) {
        for info in self.scheduler.jobs() {
            if info.label(LABEL_ALARM_ID) == Some(alarm_id) {
                if let Err(e) = self.scheduler.remove(info.id) {
                    warn!(alarm_id = %alarm_id, job_id = %info.id, "rollback removal failed: {e}");
                }
            }
        }
    }
}

/// Rebuild one record from its job group. All jobs in a group share a
/// time-of-day by construction; a single job means non-repeating.
fn record_from_group(id: String, jobs: &[JobInfo]) -> Result<Alarm> {
    let first = jobs
        .first()
        .ok_or_else(|| AlarmError::InvalidAlarm(format!("alarm {id} has no jobs")))?;

    let time = match first.cadence {
        Cadence::Daily { hour, minute } | Cadence::Weekly { hour, minute, .. } => {
            AlarmTime { hour, minute }
        }
        Cadence::Interval { .. } => {
            return Err(AlarmError::InvalidAlarm(format!(
                "alarm {id} is backed by an interval job"
            )))
        }
    };

    let next_run = jobs
        .iter()
        .map(|j| j.next_run)
        .min()
        .unwrap_or(first.next_run);

    if jobs.len() == 1 {
        return Ok(Alarm {
            id,
            time,
            repeat: false,
            days: Vec::new(),
            next_run,
        });
    }

    let mut days: Vec<String> = jobs
        .iter()
        .filter_map(|j| match j.cadence {
            Cadence::Weekly { day, .. } => Some(weekday_name(day).to_string()),
            _ => None,
        })
        .collect();
    days.sort_by_key(|d| parse_weekday(d).map(|w| w.num_days_from_monday()).unwrap_or(7));

    Ok(Alarm {
        id,
        time,
        repeat: true,
        days,
        next_run,
    })
}

/// Check ranges and day names, normalising days to lowercase canonical form.
/// Days on a non-repeating alarm are dropped.
fn validate(spec: AlarmSpec) -> Result<AlarmSpec> {
    if spec.time.hour > 23 || spec.time.minute > 59 {
        return Err(AlarmError::InvalidAlarm(format!(
            "time {}:{:02} is out of range",
            spec.time.hour, spec.time.minute
        )));
    }

    let days = if spec.repeat {
        if spec.days.is_empty() {
            return Err(AlarmError::InvalidAlarm(
                "repeating alarm needs at least one day".to_string(),
            ));
        }
        let mut days: Vec<String> = Vec::with_capacity(spec.days.len());
        for day in &spec.days {
            let name = weekday_name(parse_weekday(day)?).to_string();
            if !days.contains(&name) {
                days.push(name);
            }
        }
        days
    } else {
        Vec::new()
    };

    Ok(AlarmSpec { days, ..spec })
}
