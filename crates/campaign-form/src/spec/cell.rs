//! Lenient decoding of spreadsheet cells.
//!
//! The backing sheet hands out the same column as a string in one row and a
//! number in the next, so every text column goes through these helpers.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub(crate) fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(num) => Some(num.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(value).unwrap_or_default())
}

/// Blank cells decode as `None`.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(value).filter(|text| !text.trim().is_empty()))
}

pub(crate) fn step<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(step_number(&value))
}

pub(crate) fn step_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(num) => num
            .as_u64()
            .or_else(|| num.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// `SI` (any case) marks a yes/no column as set.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        other => text_of(other).is_some_and(|text| text.trim().eq_ignore_ascii_case("si")),
    })
}

pub(crate) fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *flag { "SI" } else { "NO" })
}
