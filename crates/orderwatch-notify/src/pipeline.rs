//! One notify cycle: fetch the order, normalize it, decide, and deliver the
//! notification when it is due.
//!
//! A cycle keeps no state of its own. The only cross-run input is the run
//! counter handed in by the caller.

use chrono::{DateTime, Utc};
use orderwatch_client::{normalize_order_at, OrderClient};
use orderwatch_core::{decide, CadencePolicy, Decision, OrderSummary};

use crate::error::NotifyError;
use crate::mailer::{dispatch, Delivery, Mailer};

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The policy decided against sending this run.
    NotDue,
    /// Sending was due but suppressed by the caller.
    DryRun,
    Delivered(Delivery),
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub summary: OrderSummary,
    pub decision: Decision,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    /// The mail body for this cycle's summary.
    #[must_use]
    pub fn body(&self) -> String {
        self.summary.to_plain_text()
    }
}

/// Runs notify cycles against one order endpoint.
pub struct Notifier<'a, M> {
    client: &'a OrderClient,
    mailer: Option<&'a M>,
    policy: CadencePolicy,
}

impl<'a, M: Mailer> Notifier<'a, M> {
    /// `mailer` is `None` when SMTP is not configured; due notifications are
    /// then skipped rather than failing the cycle.
    pub fn new(client: &'a OrderClient, mailer: Option<&'a M>, policy: CadencePolicy) -> Self {
        Self {
            client,
            mailer,
            policy,
        }
    }

    /// Runs a single cycle evaluated at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Fetch`] if the order cannot be fetched and
    /// [`NotifyError::Mail`] if a configured mailer fails to send. Nothing
    /// is retried.
    pub async fn run_cycle(
        &self,
        run_counter: Option<u64>,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> Result<CycleReport, NotifyError> {
        let order = self.client.fetch_order().await?;
        let summary = normalize_order_at(&order, now);
        let decision = decide(summary.vin.as_deref(), run_counter, &self.policy, now);

        tracing::info!(
            order_no = %summary.order_no,
            has_vin = summary.has_vin(),
            run_counter,
            period = self.policy.period(),
            fallback = %self.policy.fallback(),
            send = decision.send,
            reason = ?decision.reason,
            "notification decision"
        );

        let outcome = if !decision.send {
            CycleOutcome::NotDue
        } else if dry_run {
            CycleOutcome::DryRun
        } else {
            let body = summary.to_plain_text();
            CycleOutcome::Delivered(dispatch(self.mailer, &decision.subject, &body).await?)
        };

        Ok(CycleReport {
            summary,
            decision,
            outcome,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
