//! Notification decision policy.
//!
//! The scheduler that triggers a run keeps no state between invocations, so
//! "remind every Nth run" is computed from a run counter supplied from the
//! outside. Without one the policy falls back to a clock-derived index. The
//! hour-of-day fallback only approximates the invocation count: it is periodic
//! in wall-clock time and drifts whenever the trigger interval does not divide
//! evenly into the period.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Asia::Shanghai;
use serde::Serialize;

/// Subject prefix for the VIN-assigned notice. The VIN is appended verbatim.
pub const VIN_SUBJECT_PREFIX: &str = "VIN生成通知：";

/// Subject for the periodic "still waiting for a VIN" reminder.
pub const REMINDER_SUBJECT: &str = "订单进度提醒：暂未生成VIN";

/// Where the cadence index comes from when no run counter is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CadenceFallback {
    /// Hour of day (0-23) in Asia/Shanghai.
    #[default]
    HourOfDay,
    /// Always index 0, so every counter-less run is due.
    Zero,
}

impl FromStr for CadenceFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hour-of-day" => Ok(Self::HourOfDay),
            "zero" => Ok(Self::Zero),
            other => Err(format!("expected 'hour' or 'zero', got '{other}'")),
        }
    }
}

impl fmt::Display for CadenceFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CadenceFallback::HourOfDay => write!(f, "hour"),
            CadenceFallback::Zero => write!(f, "zero"),
        }
    }
}

/// "Send a reminder every `period` runs", plus the strategy used when the
/// run number is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadencePolicy {
    period: u32,
    fallback: CadenceFallback,
}

impl CadencePolicy {
    /// A `period` of zero is treated as one (remind on every run).
    #[must_use]
    pub fn new(period: u32, fallback: CadenceFallback) -> Self {
        Self {
            period: period.max(1),
            fallback,
        }
    }

    /// Every third run; hour of day stands in for a missing run number.
    #[must_use]
    pub fn hourly_every_third() -> Self {
        Self::new(3, CadenceFallback::HourOfDay)
    }

    /// Every second run; a missing run number counts as index 0.
    #[must_use]
    pub fn every_other_run() -> Self {
        Self::new(2, CadenceFallback::Zero)
    }

    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
    }

    #[must_use]
    pub fn fallback(&self) -> CadenceFallback {
        self.fallback
    }

    /// The index the modulo rule is applied to.
    ///
    /// A positive run counter is used as-is; `None` or `Some(0)` falls back
    /// to the configured strategy evaluated at `now`.
    #[must_use]
    pub fn cadence_index(&self, run_counter: Option<u64>, now: DateTime<Utc>) -> u64 {
        match run_counter.filter(|n| *n > 0) {
            Some(n) => n,
            None => match self.fallback {
                CadenceFallback::HourOfDay => u64::from(now.with_timezone(&Shanghai).hour()),
                CadenceFallback::Zero => 0,
            },
        }
    }

    #[must_use]
    pub fn is_due(&self, index: u64) -> bool {
        index % u64::from(self.period) == 0
    }
}

impl Default for CadencePolicy {
    fn default() -> Self {
        Self::hourly_every_third()
    }
}

/// Parses an externally supplied run counter.
///
/// Only positive integers are accepted; anything else (empty, non-numeric,
/// negative, zero) is `None` so the caller falls back to the clock.
#[must_use]
pub fn parse_run_counter(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Why a [`Decision`] came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    VinAssigned,
    CadenceDue { index: u64 },
    CadenceSkipped { index: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub send: bool,
    pub subject: String,
    pub reason: DecisionReason,
}

/// Decides whether this run sends a notification and with which subject.
///
/// An assigned VIN always wins over the cadence. Otherwise a reminder is due
/// when the cadence index is a multiple of the policy period.
#[must_use]
pub fn decide(
    vin: Option<&str>,
    run_counter: Option<u64>,
    policy: &CadencePolicy,
    now: DateTime<Utc>,
) -> Decision {
    if let Some(vin) = vin.filter(|v| !v.is_empty()) {
        return Decision {
            send: true,
            subject: format!("{VIN_SUBJECT_PREFIX}{vin}"),
            reason: DecisionReason::VinAssigned,
        };
    }

    let index = policy.cadence_index(run_counter, now);
    let send = policy.is_due(index);
    Decision {
        send,
        subject: REMINDER_SUBJECT.to_string(),
        reason: if send {
            DecisionReason::CadenceDue { index }
        } else {
            DecisionReason::CadenceSkipped { index }
        },
    }
}
