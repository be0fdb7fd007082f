//! The weekly run-and-email flow shared by the HTTP trigger and the
//! in-process schedule.

use pulse_core::PulseReport;

use crate::email::{DeliveryReceipt, EmailContent, Mailer};
use crate::error::TriggerError;
use crate::pipeline::{Pipeline, PipelineOutcome};

#[derive(Debug, Clone)]
pub enum WeeklyOutcome {
    NoReviews,
    Sent {
        report: Box<PulseReport>,
        receipt: DeliveryReceipt,
    },
}

/// Run the pipeline and email the pulse to `recipient`.
///
/// The recipient is checked before anything external is called.
///
/// # Errors
///
/// - [`TriggerError::NoRecipient`] when `recipient` is `None` or blank.
/// - [`TriggerError::Pipeline`] when the run fails.
/// - [`TriggerError::Mail`] when delivery fails.
pub async fn run_weekly_pulse(
    pipeline: &Pipeline,
    mailer: &dyn Mailer,
    recipient: Option<&str>,
) -> Result<WeeklyOutcome, TriggerError> {
    let recipient = recipient
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(TriggerError::NoRecipient)?;

    tracing::info!("weekly pulse run starting");
    let run = match pipeline.run_blocking().await? {
        PipelineOutcome::NoReviews => {
            tracing::info!("weekly pulse skipped: no reviews found");
            return Ok(WeeklyOutcome::NoReviews);
        }
        PipelineOutcome::Completed(run) => run,
    };

    let content = EmailContent::from_report(pipeline.app_name(), &run.report);
    let receipt = mailer.send_report(recipient, &content).await?;
    tracing::info!(
        reviews = run.reviews_count,
        assignments = run.assignments_count,
        "weekly pulse generated and sent"
    );

    Ok(WeeklyOutcome::Sent {
        report: Box::new(run.report),
        receipt,
    })
}
