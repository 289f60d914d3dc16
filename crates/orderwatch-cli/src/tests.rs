use chrono::{TimeZone, Utc};
use clap::Parser;
use orderwatch_core::cadence::{Decision, DecisionReason, REMINDER_SUBJECT};
use orderwatch_core::{CadencePolicy, CadenceSettings, OrderSummary, PLACEHOLDER};
use orderwatch_notify::{CycleOutcome, CycleReport, Delivery};

use super::*;
use crate::commands::{decision_for, describe_outcome, resolve_run_counter};

#[test]
fn parses_run_command_defaults() {
    let cli = Cli::try_parse_from(["orderwatch", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run {
            dry_run: false,
            run_number: None
        }
    ));
}

#[test]
fn parses_run_command_with_flags() {
    let cli = Cli::try_parse_from(["orderwatch", "run", "--dry-run", "--run-number", "12"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run {
            dry_run: true,
            run_number: Some(ref n)
        } if n == "12"
    ));
}

#[test]
fn malformed_run_number_is_accepted_by_the_parser() {
    let cli = Cli::try_parse_from(["orderwatch", "run", "--run-number", "abc"])
        .expect("malformed counters are handled by the cadence policy, not clap");
    assert!(matches!(
        cli.command,
        Commands::Run { run_number: Some(ref n), .. } if n == "abc"
    ));
}

#[test]
fn parses_show_json() {
    let cli = Cli::try_parse_from(["orderwatch", "show", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::Show { json: true }));
}

#[test]
fn parses_decide_with_vin() {
    let cli = Cli::try_parse_from(["orderwatch", "decide", "--vin", "LSJA1"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Decide { vin: Some(ref v), run_number: None } if v == "LSJA1"
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["orderwatch"]).is_err());
}

#[test]
fn run_counter_flag_overrides_configured_value() {
    assert_eq!(resolve_run_counter(Some("9"), Some(3)), Some(9));
    assert_eq!(resolve_run_counter(None, Some(3)), Some(3));
    assert_eq!(resolve_run_counter(None, None), None);
}

#[test]
fn malformed_run_counter_flag_drops_to_clock_fallback() {
    assert_eq!(resolve_run_counter(Some("abc"), Some(3)), None);
    assert_eq!(resolve_run_counter(Some("0"), Some(3)), None);
    assert_eq!(resolve_run_counter(Some("-2"), None), None);
}

fn report(outcome: CycleOutcome, reason: DecisionReason, subject: &str) -> CycleReport {
    let placeholder = || PLACEHOLDER.to_string();
    CycleReport {
        summary: OrderSummary {
            requested_at: "2025-03-14 10:00:00".to_string(),
            order_no: "O1".to_string(),
            business_order_no: placeholder(),
            order_date: placeholder(),
            pay_date: placeholder(),
            buyer_name: placeholder(),
            buyer_phone: placeholder(),
            buyer_id_number: placeholder(),
            city: placeholder(),
            dealer_name: placeholder(),
            model: placeholder(),
            version: placeholder(),
            color: placeholder(),
            retail_price: placeholder(),
            vin: None,
            config_name: None,
            config_price: None,
        },
        decision: Decision {
            send: !matches!(outcome, CycleOutcome::NotDue),
            subject: subject.to_string(),
            reason,
        },
        outcome,
    }
}

#[test]
fn describe_outcome_covers_each_result() {
    let skipped = report(
        CycleOutcome::NotDue,
        DecisionReason::CadenceSkipped { index: 10 },
        REMINDER_SUBJECT,
    );
    assert_eq!(
        describe_outcome(&skipped),
        "no notification due (cadence index 10)"
    );

    let sent = report(
        CycleOutcome::Delivered(Delivery::Sent),
        DecisionReason::VinAssigned,
        "VIN生成通知：LSJA1",
    );
    assert_eq!(describe_outcome(&sent), "sent \"VIN生成通知：LSJA1\"");

    let unconfigured = report(
        CycleOutcome::Delivered(Delivery::Skipped),
        DecisionReason::CadenceDue { index: 3 },
        REMINDER_SUBJECT,
    );
    assert!(describe_outcome(&unconfigured).starts_with("SMTP not configured"));

    let dry = report(
        CycleOutcome::DryRun,
        DecisionReason::CadenceDue { index: 3 },
        REMINDER_SUBJECT,
    );
    assert!(describe_outcome(&dry).starts_with("dry-run"));
}

fn cadence(run_number: Option<u64>) -> CadenceSettings {
    CadenceSettings {
        policy: CadencePolicy::hourly_every_third(),
        run_number,
    }
}

#[test]
fn decision_uses_cadence_settings_alone() {
    // 10:00 in Asia/Shanghai.
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 2, 0, 0).unwrap();

    let by_vin = decision_for(&cadence(None), Some("LSJA1"), None, now);
    assert_eq!(by_vin.reason, DecisionReason::VinAssigned);

    let configured = decision_for(&cadence(Some(6)), None, None, now);
    assert_eq!(configured.reason, DecisionReason::CadenceDue { index: 6 });

    let flag_wins = decision_for(&cadence(Some(6)), None, Some("7"), now);
    assert_eq!(flag_wins.reason, DecisionReason::CadenceSkipped { index: 7 });

    let clock = decision_for(&cadence(Some(6)), None, Some("abc"), now);
    assert_eq!(clock.reason, DecisionReason::CadenceSkipped { index: 10 });
}
