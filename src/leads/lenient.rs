//! Forgiving field deserializers for upstream records.
//!
//! Scraped and API records carry numbers as text ("1,204", "$2.5M"),
//! placeholders ("Unknown", "N/A") and out-of-range values. None of that
//! should fail a whole batch: unparseable values become `None` and
//! out-of-range values are clamped to the nearest valid boundary.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::EmployeeCount;

pub const MAX_RATING: f64 = 5.0;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_f64)
        .map(|r| r.clamp(0.0, MAX_RATING)))
}

pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64).map(|c| c.max(0.0) as u64))
}

pub fn money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_money(&s),
        Some(other) => as_f64(&other).map(|v| v.max(0.0)),
        None => None,
    })
}

pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

pub fn employee_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EmployeeCount>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => EmployeeCount::parse(&s),
        Some(other) => as_f64(&other).map(|n| EmployeeCount::Exact(n.max(0.0) as u64)),
        None => None,
    })
}

/// Parse "$8M", "2.5m", "$500K", "1.2B", "750000" into currency units.
pub fn parse_money(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    let cleaned = cleaned.to_lowercase();

    let (number, multiplier) = match cleaned.chars().last()? {
        'k' => (&cleaned[..cleaned.len() - 1], 1e3),
        'm' => (&cleaned[..cleaned.len() - 1], 1e6),
        'b' => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| (v * multiplier).max(0.0))
}

/// Accepts "2025-01-15" and RFC 3339 timestamps.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
