use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::{Error, Result, SENTINEL};

/// One step of a [`dig`] path.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    Field(&'a str),
    /// Negative indices count from the end, `-1` is the last element.
    Index(isize),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(value: &'a str) -> Self {
        Key::Field(value)
    }
}

/// Walks nested objects and arrays, failing with the full path if any step is missing.
pub fn dig<'v>(value: &'v Value, path: &[Key]) -> Result<&'v Value> {
    let mut current = value;
    for (depth, key) in path.iter().enumerate() {
        let next = match (key, current) {
            (Key::Field(name), Value::Object(map)) => map.get(*name),
            (Key::Index(idx), Value::Array(list)) => {
                let idx = if *idx < 0 {
                    list.len().checked_sub(idx.unsigned_abs())
                } else {
                    Some(*idx as usize)
                };
                idx.and_then(|i| list.get(i))
            }
            _ => None,
        };
        current = next.ok_or_else(|| Error::MissingField(fmt_path(&path[..=depth])))?;
    }
    Ok(current)
}

pub fn fmt_path(path: &[Key]) -> String {
    path.iter()
        .map(|key| match key {
            Key::Field(name) => name.to_string(),
            Key::Index(idx) => format!("[{idx}]"),
        })
        .collect::<Vec<_>>()
        .join(".")
}

pub fn as_i64(value: &Value, field: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .ok_or_else(|| wrong_type(field, "an integer")),
        _ => Err(wrong_type(field, "an integer")),
    }
}

/// A count cell, `null` meaning not reported.
pub fn count_cell(value: &Value, field: &str) -> Result<i64> {
    match value {
        Value::Null => Ok(SENTINEL),
        _ => as_i64(value, field),
    }
}

pub fn as_str<'v>(value: &'v Value, field: &str) -> Result<&'v str> {
    value.as_str().ok_or_else(|| wrong_type(field, "a string"))
}

pub fn wrong_type(field: &str, expected: &'static str) -> Error {
    Error::WrongType {
        field: field.to_string(),
        expected,
    }
}

pub fn timestamp_to_datetime(timestamp_ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_ms).ok_or(Error::InvalidTimestamp(timestamp_ms))
}

/// Millisecond epoch to a calendar date, truncated in UTC.
pub fn timestamp_to_date(timestamp_ms: i64) -> Result<String> {
    Ok(timestamp_to_datetime(timestamp_ms)?
        .format("%Y-%m-%d")
        .to_string())
}

/// Millisecond epoch to an ISO-8601 timestamp with an explicit `+00:00` offset.
pub fn timestamp_to_iso(timestamp_ms: i64) -> Result<String> {
    Ok(to_iso(&timestamp_to_datetime(timestamp_ms)?))
}

pub fn to_iso(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
