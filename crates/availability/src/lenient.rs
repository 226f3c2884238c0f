//! Forgiving decoders for court and booking records.
//!
//! Stored records are edited by hand and by older admin screens, so rule lists
//! can be missing, `null`, the wrong JSON type, or contain junk entries. None
//! of that is an error: a bad list reads as empty and a bad entry is skipped.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::time::{DayOfWeek, WeekdayMap};

fn strings_from(value: &Value, field: &str) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => {
                    tracing::warn!(field, entry = %other, "skipping non-string entry");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(field, value = %other, "expected a list, treating as empty");
            Vec::new()
        }
    }
}

fn days_from(value: &Value) -> Vec<DayOfWeek> {
    let mut days: Vec<DayOfWeek> = strings_from(value, "unavailableDays")
        .iter()
        .filter_map(|name| match name.parse() {
            Ok(day) => Some(day),
            Err(_) => {
                tracing::warn!(name = %name, "skipping unknown weekday");
                None
            }
        })
        .collect();
    days.sort();
    days.dedup();
    days
}

fn day_hours_from(value: &Value) -> WeekdayMap<Vec<String>> {
    let mut map: WeekdayMap<Vec<String>> = WeekdayMap::default();
    match value {
        Value::Object(entries) => {
            for (key, hours) in entries {
                match key.parse::<DayOfWeek>() {
                    Ok(day) => map[day] = strings_from(hours, "daySpecificUnavailableHours"),
                    Err(_) => tracing::warn!(key = %key, "skipping unknown weekday key"),
                }
            }
        }
        Value::Null => {}
        other => {
            tracing::warn!(value = %other, "expected a weekday mapping, treating as empty");
        }
    }
    map
}

fn parse_json(raw: &str, field: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(field, error = %e, "malformed JSON, treating as empty");
        Value::Null
    })
}

// ── Decoders for JSON text columns ──

pub fn parse_string_list(raw: &str) -> Vec<String> {
    strings_from(&parse_json(raw, "list"), "list")
}

pub fn parse_day_list(raw: &str) -> Vec<DayOfWeek> {
    days_from(&parse_json(raw, "unavailableDays"))
}

pub fn parse_day_hours(raw: &str) -> WeekdayMap<Vec<String>> {
    day_hours_from(&parse_json(raw, "daySpecificUnavailableHours"))
}

// ── serde `deserialize_with` hooks ──

pub(crate) fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(strings_from(&value, "list"))
}

pub(crate) fn day_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<DayOfWeek>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(days_from(&value))
}

pub(crate) fn day_hours<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<WeekdayMap<Vec<String>>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(day_hours_from(&value))
}

/// Record ids come through as strings or numbers depending on the store.
pub(crate) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}
