//! Command handlers for the CLI.
//!
//! Each handler receives the configuration loaded once in `main`; nothing
//! here reads the process environment.

use chrono::{DateTime, Utc};
use orderwatch_client::{normalize_order, OrderClient};
use orderwatch_core::cadence::DecisionReason;
use orderwatch_core::{decide, parse_run_counter, AppConfig, CadenceSettings, Decision};
use orderwatch_notify::{CycleOutcome, CycleReport, Delivery, Notifier, SmtpMailer};

/// Picks the run counter for this invocation.
///
/// An explicit `--run-number` wins over the configured counter. A malformed
/// flag does not fall back to the configured value: it is dropped, so the
/// policy's clock-derived fallback applies.
pub(crate) fn resolve_run_counter(flag: Option<&str>, configured: Option<u64>) -> Option<u64> {
    let Some(raw) = flag else {
        return configured;
    };
    let parsed = parse_run_counter(raw);
    if parsed.is_none() {
        tracing::warn!(
            raw,
            "ignoring malformed --run-number; cadence falls back to the clock"
        );
    }
    parsed
}

/// One-line, human-readable result of a notify cycle.
pub(crate) fn describe_outcome(report: &CycleReport) -> String {
    let subject = &report.decision.subject;
    match report.outcome {
        CycleOutcome::NotDue => match report.decision.reason {
            DecisionReason::CadenceSkipped { index } => {
                format!("no notification due (cadence index {index})")
            }
            _ => "no notification due".to_string(),
        },
        CycleOutcome::DryRun => format!("dry-run: would send \"{subject}\""),
        CycleOutcome::Delivered(Delivery::Sent) => format!("sent \"{subject}\""),
        CycleOutcome::Delivered(Delivery::Skipped) => {
            format!("SMTP not configured; skipped \"{subject}\"")
        }
    }
}

/// Runs one notify cycle: fetch, normalize, decide, and send when due.
///
/// # Errors
///
/// Returns an error if the client or mailer cannot be built, the order
/// cannot be fetched, or a configured mailer fails to send.
pub(crate) async fn run_notify(
    config: &AppConfig,
    run_number: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = OrderClient::from_config(config)?;
    let mailer = config
        .smtp
        .as_ref()
        .map(SmtpMailer::from_settings)
        .transpose()?;
    let run_counter = resolve_run_counter(run_number, config.run_number);

    let notifier = Notifier::new(&client, mailer.as_ref(), config.cadence);
    let report = notifier.run_cycle(run_counter, Utc::now(), dry_run).await?;

    println!("{}", describe_outcome(&report));
    if report.outcome == CycleOutcome::DryRun {
        println!("\n{}", report.body());
    }
    Ok(())
}

/// Fetches the order and prints its summary.
///
/// # Errors
///
/// Returns an error if the order cannot be fetched or serialized.
pub(crate) async fn run_show(config: &AppConfig, as_json: bool) -> anyhow::Result<()> {
    let client = OrderClient::from_config(config)?;
    let order = client.fetch_order().await?;
    let summary = normalize_order(&order);

    if as_json {
        let payload = serde_json::json!({ "summary": summary, "raw": order });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for (label, value) in summary.lines() {
        println!("{label}: {value}");
    }
    Ok(())
}

/// Prints the decision the policy would make right now. Needs no order
/// endpoint configuration.
///
/// # Errors
///
/// Returns an error if the decision cannot be serialized.
pub(crate) fn run_decide(
    cadence: &CadenceSettings,
    vin: Option<&str>,
    run_number: Option<&str>,
) -> anyhow::Result<()> {
    let decision = decision_for(cadence, vin, run_number, Utc::now());
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

/// The decision `decide` prints, evaluated at `now`.
pub(crate) fn decision_for(
    cadence: &CadenceSettings,
    vin: Option<&str>,
    run_number: Option<&str>,
    now: DateTime<Utc>,
) -> Decision {
    let run_counter = resolve_run_counter(run_number, cadence.run_number);
    decide(vin, run_counter, &cadence.policy, now)
}
