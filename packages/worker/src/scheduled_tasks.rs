//! Scheduled discovery runs using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every minute by default)
//!     │
//!     └─► run_once()
//!             └─► at most one task: todo → processing → terminal
//! ```
//!
//! Ticks are not serialized: a run that outlasts the interval overlaps the
//! next one, and both may select the same task.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use discovery::{run_once, PipelineDeps, RunOutcome};

/// Start the discovery job on the given cron schedule.
pub async fn start_scheduler(deps: PipelineDeps, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let deps = Arc::new(deps);
    let discovery_job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = deps.clone();
        Box::pin(async move {
            run_discovery(&deps).await;
        })
    })?;

    scheduler.add(discovery_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "Scheduled discovery started");
    Ok(scheduler)
}

/// One scheduler tick.
async fn run_discovery(deps: &PipelineDeps) {
    match run_once(deps).await {
        RunOutcome::NoTask => tracing::debug!("Discovery tick found no task"),
        RunOutcome::Found {
            task_id,
            business_id,
        } => tracing::info!(task_id, business_id, "Discovery tick added a business"),
        RunOutcome::NotFound { task_id } => {
            tracing::info!(task_id, "Discovery tick found no business")
        }
        RunOutcome::Errored { task_id, error } => {
            tracing::warn!(task_id, error = %error, "Discovery tick failed")
        }
        RunOutcome::Abandoned { task_id, error } => {
            tracing::error!(task_id, error = %error, "Discovery tick could not claim task")
        }
    }
}
