//! Background job scheduler.
//!
//! When a cron expression is configured, the weekly pulse runs in-process on
//! that schedule using the same flow as the HTTP trigger.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use pulse_pipeline::{run_weekly_pulse, Services, WeeklyOutcome};

/// Builds and starts the background job scheduler.
///
/// Returns `None` when no schedule is configured. Otherwise returns the
/// running [`JobScheduler`] handle, which must be kept alive for the lifetime
/// of the process; dropping it shuts down the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    services: Services,
    schedule: Option<&str>,
    recipient: Option<String>,
) -> Result<Option<JobScheduler>, JobSchedulerError> {
    let Some(schedule) = schedule.map(str::trim).filter(|s| !s.is_empty()) else {
        tracing::info!("scheduler: no weekly pulse schedule configured");
        return Ok(None);
    };

    let scheduler = JobScheduler::new().await?;
    register_weekly_pulse_job(&scheduler, schedule, services, recipient).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "scheduler: weekly pulse job registered");
    Ok(Some(scheduler))
}

async fn register_weekly_pulse_job(
    scheduler: &JobScheduler,
    schedule: &str,
    services: Services,
    recipient: Option<String>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let services = services.clone();
        let recipient = recipient.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting weekly pulse run");
            let outcome = run_weekly_pulse(
                &services.pipeline,
                services.mailer.as_ref(),
                recipient.as_deref(),
            )
            .await;
            match outcome {
                Ok(WeeklyOutcome::Sent { receipt, .. }) => {
                    tracing::info!(id = ?receipt.id, "scheduler: weekly pulse sent");
                }
                Ok(WeeklyOutcome::NoReviews) => {
                    tracing::info!("scheduler: no reviews in window; nothing sent");
                }
                Err(e) => tracing::error!(error = %e, "scheduler: weekly pulse run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
