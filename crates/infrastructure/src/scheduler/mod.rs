//! Cron-based task scheduler for the stop polls
//!
//! Every configured stop gets one named job on a 6-field cron schedule
//! (every minute by default). Each run's outcome is counted per task; a
//! failed run is logged and the next tick is the only retry.
//!
//! Uses `tokio-cron-scheduler` for cron-based scheduling.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, info, instrument, warn};

/// Default poll schedule: second 0 of every minute
pub const EVERY_MINUTE: &str = "0 * * * * *";

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// A task with this name is already scheduled
    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Run statistics of one scheduled task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    /// Task name
    pub name: String,
    /// Cron expression
    pub cron_expression: String,
    /// Number of successful runs
    pub success_count: u64,
    /// Number of failed runs
    pub failure_count: u64,
    /// Start of the last run
    pub last_run: Option<DateTime<Utc>>,
    /// Start of the last successful run
    pub last_success: Option<DateTime<Utc>>,
    /// Error of the last failed run
    pub last_error: Option<String>,
}

impl TaskStats {
    fn new(name: &str, cron_expression: &str) -> Self {
        Self {
            name: name.to_string(),
            cron_expression: cron_expression.to_string(),
            success_count: 0,
            failure_count: 0,
            last_run: None,
            last_success: None,
            last_error: None,
        }
    }

    fn record(&mut self, started: DateTime<Utc>, result: Result<(), String>) {
        self.last_run = Some(started);
        match result {
            Ok(()) => {
                self.success_count += 1;
                self.last_success = Some(started);
            },
            Err(e) => {
                self.failure_count += 1;
                self.last_error = Some(e);
            },
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether to start the scheduler immediately
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

/// Validate a 6-field cron expression
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidCronExpression`] if it does not parse.
pub fn validate_cron(cron_expression: &str) -> Result<(), SchedulerError> {
    cron_expression
        .parse::<cron::Schedule>()
        .map(|_| ())
        .map_err(|e| SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}")))
}

/// Task scheduler for the recurring poll jobs
pub struct TaskScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    stats: Arc<RwLock<BTreeMap<String, TaskStats>>>,
    running: AtomicBool,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("tasks", &self.stats.read().len())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    /// Create a new task scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let instance = Self {
            scheduler: AsyncMutex::new(JobScheduler::new().await?),
            stats: Arc::new(RwLock::new(BTreeMap::new())),
            running: AtomicBool::new(false),
        };

        if config.auto_start {
            instance.start().await?;
        }

        debug!("Task scheduler initialized");
        Ok(instance)
    }

    /// Start firing jobs; a no-op when already running
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.scheduler.lock().await.start().await {
            self.running.store(false, Ordering::Release);
            return Err(e.into());
        }
        info!("Task scheduler started");
        Ok(())
    }

    /// Shut the scheduler down; a no-op when not running
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.scheduler.lock().await.shutdown().await?;
        info!("Task scheduler stopped");
        Ok(())
    }

    /// Schedule `task` under a unique `name`
    ///
    /// `cron_expression` has 6 fields: sec min hour day month weekday.
    /// A task returning `Err` is counted as failed.
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        validate_cron(cron_expression)?;

        {
            let mut stats = self.stats.write();
            if stats.contains_key(name) {
                return Err(SchedulerError::DuplicateTask(name.to_string()));
            }
            stats.insert(name.to_string(), TaskStats::new(name, cron_expression));
        }

        let task_name = name.to_string();
        let stats = Arc::clone(&self.stats);
        let scheduled = Job::new_async(cron_expression, move |_id, _scheduler| {
            let name = task_name.clone();
            let stats = Arc::clone(&stats);
            let run = task();

            Box::pin(async move {
                let started = Utc::now();
                debug!(task = %name, "Running scheduled task");
                let result = run.await;
                if let Err(e) = &result {
                    warn!(task = %name, error = %e, "Scheduled task failed");
                }
                if let Some(entry) = stats.write().get_mut(&name) {
                    entry.record(started, result);
                }
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()));

        let added = match scheduled {
            Ok(job) => self
                .scheduler
                .lock()
                .await
                .add(job)
                .await
                .map(|_| ())
                .map_err(SchedulerError::from),
            Err(e) => Err(e),
        };
        if added.is_err() {
            self.stats.write().remove(name);
        }
        added?;

        info!(task = %name, cron = %cron_expression, "Task scheduled");
        Ok(())
    }

    /// Statistics of one task
    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.stats.read().get(name).cloned()
    }

    /// Statistics of every task, ordered by name
    #[must_use]
    pub fn get_all_stats(&self) -> Vec<TaskStats> {
        self.stats.read().values().cloned().collect()
    }

    /// Number of scheduled tasks
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.stats.read().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;

    async fn stopped_scheduler() -> TaskScheduler {
        TaskScheduler::new(SchedulerConfig { auto_start: false })
            .await
            .unwrap()
    }

    #[test]
    fn test_validate_cron() {
        assert!(validate_cron(EVERY_MINUTE).is_ok());
        assert!(validate_cron("*/30 * * * * *").is_ok());
        assert!(validate_cron("every minute").is_err());
    }

    #[test]
    fn test_stats_record_outcomes() {
        let mut stats = TaskStats::new("poll_sensor.atb_stop", EVERY_MINUTE);
        let now = Utc::now();

        stats.record(now, Err("Network failure: refused".to_string()));
        stats.record(now, Ok(()));

        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.last_run, Some(now));
        assert_eq!(stats.last_success, Some(now));
        assert_eq!(stats.last_error.as_deref(), Some("Network failure: refused"));
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();
        assert!(scheduler.running.load(Ordering::Relaxed));
        scheduler.start().await.unwrap();

        scheduler.stop().await.unwrap();
        assert!(!scheduler.running.load(Ordering::Relaxed));
        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_add_task() {
        let scheduler = stopped_scheduler().await;

        scheduler
            .add_task("poll_sensor.atb_stop", EVERY_MINUTE, || async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(scheduler.task_count(), 1);
        let stats = scheduler.get_task_stats("poll_sensor.atb_stop").unwrap();
        assert_eq!(stats.cron_expression, EVERY_MINUTE);
        assert_eq!(stats.success_count, 0);
        assert!(stats.last_run.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_task_rejected() {
        let scheduler = stopped_scheduler().await;

        scheduler
            .add_task("dup", EVERY_MINUTE, || async { Ok(()) })
            .await
            .unwrap();
        let result = scheduler
            .add_task("dup", EVERY_MINUTE, || async { Ok(()) })
            .await;

        assert!(matches!(result, Err(SchedulerError::DuplicateTask(_))));
        assert_eq!(scheduler.task_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_cron_expression_leaves_no_task() {
        let scheduler = stopped_scheduler().await;

        let result = scheduler
            .add_task("bad-task", "invalid cron", || async { Ok(()) })
            .await;

        assert!(matches!(result, Err(SchedulerError::InvalidCronExpression(_))));
        assert_eq!(scheduler.task_count(), 0);
    }

    #[tokio::test]
    async fn test_all_stats_ordered_by_name() {
        let scheduler = stopped_scheduler().await;
        for name in ["poll_sensor.b", "poll_sensor.a"] {
            scheduler
                .add_task(name, EVERY_MINUTE, || async { Ok(()) })
                .await
                .unwrap();
        }

        let names: Vec<_> = scheduler.get_all_stats().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["poll_sensor.a", "poll_sensor.b"]);
    }

    #[tokio::test]
    async fn test_task_runs_and_records_stats() {
        let scheduler = TaskScheduler::new(SchedulerConfig::default())
            .await
            .unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = Arc::clone(&counter);

        scheduler
            .add_task("every-second", "* * * * * *", move || {
                let counter = Arc::clone(&task_counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err("first run fails".to_string())
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        scheduler.stop().await.unwrap();

        let stats = scheduler.get_task_stats("every-second").unwrap();
        assert!(counter.load(Ordering::SeqCst) >= 2);
        assert_eq!(stats.failure_count, 1);
        assert!(stats.success_count >= 1);
        assert_eq!(stats.last_error.as_deref(), Some("first run fails"));
    }
}
