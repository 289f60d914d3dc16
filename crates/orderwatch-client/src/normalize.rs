//! Normalization of raw upstream order records into [`OrderSummary`].
//!
//! Upstream has renamed several fields across API versions, so every summary
//! field is looked up through an ordered list of candidate keys and the first
//! present, non-empty value wins. Nothing here fails: missing or malformed
//! data ends up as the [`PLACEHOLDER`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;
use orderwatch_core::summary::{OrderSummary, PLACEHOLDER};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use crate::client::RawOrder;
use crate::nested::{parse_embedded_json, value_at};

const ORDER_NO_KEYS: &[&str] = &["orderNo", "orderNumber"];
const BUSINESS_ORDER_NO_KEYS: &[&str] = &["bizOrderNo", "businessOrderNo"];
const ORDER_DATE_KEYS: &[&str] = &["orderTime", "orderDate", "createTime"];
const PAY_DATE_KEYS: &[&str] = &["payTime", "payDate"];
const BUYER_NAME_KEYS: &[&str] = &["buyerName", "customerName"];
const BUYER_PHONE_KEYS: &[&str] = &["buyerPhone", "buyerMobile"];
const BUYER_ID_KEYS: &[&str] = &["buyerIdCard", "idCardNo"];
const PROVINCE_KEYS: &[&str] = &["provinceName"];
const CITY_NAME_KEYS: &[&str] = &["cityName"];
const LEGACY_CITY_KEYS: &[&str] = &["city"];
const DEALER_KEYS: &[&str] = &["dealerName", "storeName"];
const MODEL_KEYS: &[&str] = &["modelName", "seriesName"];
const VERSION_KEYS: &[&str] = &["versionName", "trimName"];
const EXTERIOR_COLOR_KEYS: &[&str] = &["exteriorColor", "outerColor"];
const INTERIOR_COLOR_KEYS: &[&str] = &["interiorColor", "innerColor"];
const LEGACY_COLOR_KEYS: &[&str] = &["color"];
const RETAIL_PRICE_KEYS: &[&str] = &["retailPrice", "guidePrice"];
const VIN_KEYS: &[&str] = &["vehicleVin", "vin"];
const CONFIG_KEYS: &[&str] = &["configInfo", "vehicleConfig"];
const CONFIG_NAME_PATHS: &[&str] = &[
    "configFullName",
    "fullName",
    "name",
    "carConfig.fullName",
];
const CONFIG_PRICE_PATHS: &[&str] = &["configPrice", "totalPrice", "price", "carConfig.price"];

const CURRENCY_GLYPH: char = '¥';
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a value counts as present: not null and not the empty string.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Returns the first candidate that is present (see [`is_present`]).
///
/// Candidates are evaluated in order; later ones are never consulted once
/// one qualifies.
pub fn first_non_empty<I>(candidates: I) -> Option<Value>
where
    I: IntoIterator<Item = Option<Value>>,
{
    candidates.into_iter().flatten().find(is_present)
}

/// Text shown for a value: strings verbatim, everything else as compact JSON.
#[must_use]
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Formats an amount as yuan with thousands separators and two decimals.
///
/// Null, blank and non-scalar input yield the placeholder. A string that is
/// present but not numeric is returned unchanged, so corrupt data stays
/// visible instead of being masked as missing.
#[must_use]
pub fn format_currency(value: &Value) -> String {
    match value {
        Value::Number(n) => match parse_amount(&n.to_string()) {
            Some(amount) => amount.to_yuan(),
            None => n.to_string(),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return PLACEHOLDER.to_string();
            }
            parse_amount(trimmed).map_or_else(|| s.clone(), |amount| amount.to_yuan())
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// A parsed amount. Values outside `Decimal`'s range keep `f64` precision.
enum Amount {
    Exact(Decimal),
    Approx(f64),
}

impl Amount {
    fn to_yuan(&self) -> String {
        match self {
            Amount::Exact(amount) => {
                let rounded =
                    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                render_yuan(rounded.is_sign_negative(), &format!("{:.2}", rounded.abs()))
            }
            Amount::Approx(amount) => {
                render_yuan(amount.is_sign_negative(), &format!("{:.2}", amount.abs()))
            }
        }
    }
}

fn parse_amount(text: &str) -> Option<Amount> {
    // `rust_decimal` accepts digit separators; upstream amounts never carry them.
    if text.is_empty() || text.contains('_') {
        return None;
    }
    if let Ok(amount) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Some(Amount::Exact(amount));
    }
    let looks_numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !looks_numeric {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .map(Amount::Approx)
}

/// Groups the integer part of a fixed two-decimal rendering and adds the
/// glyph. A value that rounds to zero never carries a sign.
fn render_yuan(negative: bool, fixed: &str) -> String {
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let sign = if negative && !is_zero { "-" } else { "" };
    format!("{sign}{CURRENCY_GLYPH}{grouped}.{fraction}")
}

fn fields<'a>(
    record: &'a Map<String, Value>,
    keys: &'a [&'a str],
) -> impl Iterator<Item = Option<Value>> + 'a {
    keys.iter().map(move |key| value_at(record, key).cloned())
}

fn pick(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_non_empty(fields(record, keys)).map(|v| display_text(&v))
}

fn pick_or_placeholder(record: &Map<String, Value>, keys: &[&str]) -> String {
    pick(record, keys).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Province and city joined by a single space, skipping blank parts.
fn joined_city(record: &Map<String, Value>) -> Option<Value> {
    let parts: Vec<String> = [PROVINCE_KEYS, CITY_NAME_KEYS]
        .into_iter()
        .filter_map(|keys| pick(record, keys))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| Value::String(parts.join(" ")))
}

/// `"<exterior> / <interior>"`, each side defaulting on its own. Absent when
/// neither side is known so the legacy field can take over.
fn paired_color(record: &Map<String, Value>) -> Option<Value> {
    let exterior = pick(record, EXTERIOR_COLOR_KEYS);
    let interior = pick(record, INTERIOR_COLOR_KEYS);
    if exterior.is_none() && interior.is_none() {
        return None;
    }
    Some(Value::String(format!(
        "{} / {}",
        exterior.as_deref().unwrap_or(PLACEHOLDER),
        interior.as_deref().unwrap_or(PLACEHOLDER)
    )))
}

/// The configuration sub-object, or an empty map when it is missing or its
/// JSON text does not decode.
fn configuration(record: &Map<String, Value>) -> Map<String, Value> {
    first_non_empty(fields(record, CONFIG_KEYS))
        .and_then(|value| parse_embedded_json(&value))
        .unwrap_or_default()
}

/// Normalizes `record`, stamping the summary with the current time.
#[must_use]
pub fn normalize_order(record: &RawOrder) -> OrderSummary {
    normalize_order_at(record, Utc::now())
}

/// Normalizes `record`, stamping the summary with `now` rendered in
/// Asia/Shanghai.
#[must_use]
pub fn normalize_order_at(record: &RawOrder, now: DateTime<Utc>) -> OrderSummary {
    let city = first_non_empty(
        std::iter::once(joined_city(record)).chain(fields(record, LEGACY_CITY_KEYS)),
    )
    .map_or_else(|| PLACEHOLDER.to_string(), |v| display_text(&v));
    let color = first_non_empty(
        std::iter::once(paired_color(record)).chain(fields(record, LEGACY_COLOR_KEYS)),
    )
    .map_or_else(|| PLACEHOLDER.to_string(), |v| display_text(&v));
    let retail_price = first_non_empty(fields(record, RETAIL_PRICE_KEYS))
        .map_or_else(|| PLACEHOLDER.to_string(), |v| format_currency(&v));

    let config = configuration(record);
    let config_name = pick(&config, CONFIG_NAME_PATHS);
    let config_price =
        first_non_empty(fields(&config, CONFIG_PRICE_PATHS)).map(|v| format_currency(&v));

    OrderSummary {
        requested_at: now
            .with_timezone(&Shanghai)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        order_no: pick_or_placeholder(record, ORDER_NO_KEYS),
        business_order_no: pick_or_placeholder(record, BUSINESS_ORDER_NO_KEYS),
        order_date: pick_or_placeholder(record, ORDER_DATE_KEYS),
        pay_date: pick_or_placeholder(record, PAY_DATE_KEYS),
        buyer_name: pick_or_placeholder(record, BUYER_NAME_KEYS),
        buyer_phone: pick_or_placeholder(record, BUYER_PHONE_KEYS),
        buyer_id_number: pick_or_placeholder(record, BUYER_ID_KEYS),
        city,
        dealer_name: pick_or_placeholder(record, DEALER_KEYS),
        model: pick_or_placeholder(record, MODEL_KEYS),
        version: pick_or_placeholder(record, VERSION_KEYS),
        color,
        retail_price,
        vin: pick(record, VIN_KEYS),
        config_name,
        config_price,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
