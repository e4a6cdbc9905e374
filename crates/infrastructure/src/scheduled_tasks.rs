//! Poll task factories for the scheduler
//!
//! Each configured stop gets one cron job. A job locks its monitor for the
//! whole cycle, so polls of the same stop never overlap.

use std::sync::Arc;

use application::StopMonitor;
use futures::future::BoxFuture;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::scheduler::{SchedulerError, TaskScheduler};

/// Monitor shared between the scheduler and its owner
pub type SharedMonitor = Arc<AsyncMutex<StopMonitor>>;

/// Scheduler task name for a monitor's poll job
#[must_use]
pub fn poll_task_name(entity_id: &str) -> String {
    format!("poll_{entity_id}")
}

/// Run one poll cycle and log its outcome
///
/// A failed cycle leaves the previous state published; the next scheduled
/// tick is the only retry.
pub async fn poll_once(monitor: &mut StopMonitor) -> Result<(), String> {
    match monitor.poll().await {
        Ok(outcome) => {
            debug!(
                entity_id = %monitor.entity_id(),
                departures = outcome.departures,
                summary_matched = outcome.summary_matched,
                slots_updated = outcome.slots_updated,
                "Poll completed"
            );
            Ok(())
        },
        Err(e) => {
            warn!(
                entity_id = %monitor.entity_id(),
                kind = e.kind(),
                error = %e,
                "Poll failed, keeping previous state"
            );
            Err(format!("Poll of {} failed: {e}", monitor.entity_id()))
        },
    }
}

/// Create a poll task closure for one monitor
pub fn create_poll_task(
    monitor: SharedMonitor,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let monitor = Arc::clone(&monitor);

        Box::pin(async move {
            let mut monitor = monitor.lock().await;
            poll_once(&mut monitor).await
        })
    }
}

/// Register one poll job per monitor
///
/// # Errors
///
/// Returns an error if the cron expression is invalid or a task with the
/// same name already exists.
pub async fn schedule_polls(
    scheduler: &TaskScheduler,
    cron_expression: &str,
    monitors: &[SharedMonitor],
) -> Result<(), SchedulerError> {
    for monitor in monitors {
        let name = poll_task_name(monitor.lock().await.entity_id());
        scheduler
            .add_task(&name, cron_expression, create_poll_task(Arc::clone(monitor)))
            .await?;
    }

    info!(count = monitors.len(), cron = %cron_expression, "Poll jobs scheduled");
    Ok(())
}
