//! Request payload helpers.
//!
//! Presence and type checks on loosely typed JSON bodies, plus the merge used
//! by partial updates.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// A request body failed presence or type checks.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The body as an object, or `message` as the error.
pub fn object<'a>(payload: &'a Value, message: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    payload.as_object().ok_or_else(|| ValidationError::new(message))
}

/// A non-empty string field.
pub fn text<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// A numeric field.
pub fn number<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a Number> {
    match payload.get(key) {
        Some(Value::Number(n)) => Some(n),
        _ => None,
    }
}

/// An array field.
pub fn array<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    payload.get(key).and_then(Value::as_array)
}

/// A numeric field that must be a non-negative whole number fitting `u32`.
pub fn whole_number(payload: &Map<String, Value>, key: &str) -> Result<Option<u32>, ValidationError> {
    match number(payload, key) {
        None => Ok(None),
        Some(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ValidationError::new(format!("{key} must be a whole number"))),
    }
}

/// Overlay `patch` onto `record` field by field and re-type the result.
///
/// Keys listed in `frozen` are never overwritten.
pub fn merge<T>(record: &T, patch: &Map<String, Value>, frozen: &[&str]) -> Result<T, ValidationError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(ValidationError::new("record is not an object")),
        Err(err) => return Err(ValidationError::new(err.to_string())),
    };

    for (key, value) in patch {
        if !frozen.contains(&key.as_str()) {
            merged.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|err| ValidationError::new(format!("invalid field value: {err}")))
}

/// Next numeric id: the current time in milliseconds, bumped past `existing`.
///
/// `None` when the largest existing id leaves no room above it.
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> Option<i64> {
    let now = Utc::now().timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now => max.checked_add(1),
        _ => Some(now),
    }
}
