use std::env::VarError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::app_config::{AppConfig, CadenceSettings, SmtpSettings, SmtpTls};
use crate::cadence::{parse_run_counter, CadenceFallback, CadencePolicy};
use crate::ConfigError;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the reminder cadence and run counter.
///
/// Does not require the order endpoint, so offline commands work without it.
///
/// # Errors
///
/// Returns `ConfigError` if the cadence variables are invalid.
pub fn load_cadence_settings() -> Result<CadenceSettings, ConfigError> {
    dotenvy::dotenv().ok();
    build_cadence_settings(&|key: &str| std::env::var(key))
}

/// The `ORDERWATCH_LOG_LEVEL` filter directive, `info` when unset.
///
/// Binaries read this before the full configuration so that configuration
/// errors are themselves logged.
#[must_use]
pub fn load_log_level() -> String {
    dotenvy::dotenv().ok();
    log_level(&|key: &str| std::env::var(key))
}

fn optional<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    lookup(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Result<String, VarError>,
{
    optional(lookup, var).unwrap_or_else(|| default.to_string())
}

fn invalid(var: &str, reason: impl Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or_default<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: Display,
{
    or_default(lookup, var, default)
        .parse::<T>()
        .map_err(|e| invalid(var, e))
}

fn log_level<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Result<String, VarError>,
{
    or_default(lookup, "ORDERWATCH_LOG_LEVEL", DEFAULT_LOG_LEVEL)
}

fn build_cadence_settings<F>(lookup: &F) -> Result<CadenceSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let run_number = optional(lookup, "ORDERWATCH_RUN_NUMBER")
        .or_else(|| optional(lookup, "GITHUB_RUN_NUMBER"))
        .and_then(|raw| parse_run_counter(&raw));

    let period: u32 = parse_or_default(lookup, "ORDERWATCH_CADENCE_PERIOD", "3")?;
    if period == 0 {
        return Err(invalid("ORDERWATCH_CADENCE_PERIOD", "must be a positive integer"));
    }
    let fallback: CadenceFallback =
        parse_or_default(lookup, "ORDERWATCH_CADENCE_FALLBACK", "hour")?;

    Ok(CadenceSettings {
        policy: CadencePolicy::new(period, fallback),
        run_number,
    })
}

fn build_smtp_settings<F>(lookup: &F) -> Result<Option<SmtpSettings>, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw_port: u32 = parse_or_default(lookup, "ORDERWATCH_SMTP_PORT", "465")?;
    let port = u16::try_from(raw_port).map_err(|e| invalid("ORDERWATCH_SMTP_PORT", e))?;
    let tls = parse_smtp_tls(&or_default(lookup, "ORDERWATCH_SMTP_TLS", "implicit"))?;
    let recipients: Vec<String> = optional(lookup, "ORDERWATCH_MAIL_TO")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let settings = match (
        optional(lookup, "ORDERWATCH_SMTP_HOST"),
        optional(lookup, "ORDERWATCH_SMTP_USER"),
        optional(lookup, "ORDERWATCH_SMTP_PASS"),
    ) {
        (Some(host), Some(username), Some(password)) if !recipients.is_empty() => {
            let from =
                optional(lookup, "ORDERWATCH_MAIL_FROM").unwrap_or_else(|| username.clone());
            Some(SmtpSettings {
                host,
                port,
                tls,
                username,
                password,
                from,
                to: recipients,
            })
        }
        _ => None,
    };
    Ok(settings)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Blank values are treated the same as unset ones. This module is the only
/// place process environment is consulted; everything downstream receives
/// the resulting [`AppConfig`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let lookup = &lookup;

    let order_url = optional(lookup, "ORDERWATCH_ORDER_URL")
        .ok_or_else(|| ConfigError::MissingEnvVar("ORDERWATCH_ORDER_URL".to_string()))?;

    let bind_addr: SocketAddr =
        parse_or_default(lookup, "ORDERWATCH_BIND_ADDR", "0.0.0.0:3000")?;
    let request_timeout_secs: u64 =
        parse_or_default(lookup, "ORDERWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let cadence = build_cadence_settings(lookup)?;

    Ok(AppConfig {
        bind_addr,
        order_url,
        api_token: optional(lookup, "ORDERWATCH_API_TOKEN"),
        api_token_header: or_default(lookup, "ORDERWATCH_API_TOKEN_HEADER", "Authorization"),
        cookie: optional(lookup, "ORDERWATCH_COOKIE"),
        request_timeout_secs,
        user_agent: or_default(
            lookup,
            "ORDERWATCH_USER_AGENT",
            "orderwatch/0.1 (order-status)",
        ),
        smtp: build_smtp_settings(lookup)?,
        run_number: cadence.run_number,
        cadence: cadence.policy,
        notify_cron: optional(lookup, "ORDERWATCH_NOTIFY_CRON"),
    })
}

fn parse_smtp_tls(s: &str) -> Result<SmtpTls, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "implicit" | "ssl" | "tls" => Ok(SmtpTls::Implicit),
        "starttls" => Ok(SmtpTls::StartTls),
        other => Err(invalid(
            "ORDERWATCH_SMTP_TLS",
            format!("expected implicit or starttls, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
