//! Lenient attribute coercion for source values.
//!
//! The published files are not always consistent about scalar types (numbers
//! occasionally arrive quoted, dates sometimes carry a time part). These helpers
//! accept the common variants and reject anything else, which surfaces as a
//! per-line decode failure.

use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Text(String),
}

impl IntLike {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            IntLike::Int(n) => Ok(n),
            IntLike::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("expected an integer, found \"{}\"", s))),
        }
    }
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntLike>::deserialize(deserializer)? {
        Some(v) => v.into_i64().map(Some),
        None => Ok(None),
    }
}

pub fn opt_i64_seq<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<IntLike>>::deserialize(deserializer)? {
        Some(items) => items
            .into_iter()
            .map(IntLike::into_i64)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        None => Ok(None),
    }
}

pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(s) => s,
        None => return Ok(None),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| de::Error::custom(format!("expected a date, found \"{}\"", raw)))
}

/// Accepts a JSON object; anything else is a type error.
pub fn opt_object<'de, D>(deserializer: D) -> Result<Option<serde_json::Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(de::Error::custom(format!(
            "expected a mapping, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
