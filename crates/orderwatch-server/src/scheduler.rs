//! In-process notify trigger.
//!
//! When `ORDERWATCH_NOTIFY_CRON` is set the display server runs the same
//! notify cycle as `orderwatch run` on that schedule. Scheduled runs carry no
//! run counter, so the configured cadence fallback decides reminders.

use std::sync::Arc;

use chrono::Utc;
use orderwatch_client::OrderClient;
use orderwatch_core::CadencePolicy;
use orderwatch_notify::{CycleOutcome, Notifier, SmtpMailer};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with the notify job registered.
///
/// The returned handle must be kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if `cron` is not a valid schedule or the
/// scheduler cannot be initialised or started.
pub async fn build_scheduler(
    cron: &str,
    client: Arc<OrderClient>,
    mailer: Option<Arc<SmtpMailer>>,
    policy: CadencePolicy,
) -> Result<JobScheduler, JobSchedulerError> {
    let job = notify_job(cron, client, mailer, policy)?;

    let scheduler = JobScheduler::new().await?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(cron, "scheduler: notify job registered");
    Ok(scheduler)
}

fn notify_job(
    cron: &str,
    client: Arc<OrderClient>,
    mailer: Option<Arc<SmtpMailer>>,
    policy: CadencePolicy,
) -> Result<Job, JobSchedulerError> {
    Job::new_async(cron, move |_uuid, _lock| {
        let client = Arc::clone(&client);
        let mailer = mailer.clone();

        Box::pin(async move {
            run_notify_job(&client, mailer.as_deref(), policy).await;
        })
    })
}

/// Runs one cycle and logs the result. Failures end the cycle; the next
/// scheduled tick starts fresh.
async fn run_notify_job(
    client: &OrderClient,
    mailer: Option<&SmtpMailer>,
    policy: CadencePolicy,
) {
    tracing::info!("scheduler: starting notify cycle");
    let notifier = Notifier::new(client, mailer, policy);

    match notifier.run_cycle(None, Utc::now(), false).await {
        Ok(report) => {
            let delivered = matches!(report.outcome, CycleOutcome::Delivered(_));
            tracing::info!(
                order_no = %report.summary.order_no,
                send = report.decision.send,
                delivered,
                outcome = ?report.outcome,
                "scheduler: notify cycle complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: notify cycle failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Arc<OrderClient> {
        Arc::new(
            OrderClient::new("http://127.0.0.1:9/order", 1, "orderwatch-test", &[])
                .expect("client"),
        )
    }

    #[tokio::test]
    async fn invalid_cron_expression_is_rejected() {
        let result = notify_job(
            "every morning",
            client(),
            None,
            CadencePolicy::hourly_every_third(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn six_field_cron_expression_is_accepted() {
        let result = notify_job(
            "0 0 * * * *",
            client(),
            None,
            CadencePolicy::hourly_every_third(),
        );
        assert!(result.is_ok());
    }
}
