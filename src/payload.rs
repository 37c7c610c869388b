//! Request payload helpers.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A JSON object sent as a request body. Keys keep insertion order.
pub type Payload = Map<String, Value>;

/// Parses `raw` as a JSON object.
///
/// `field` names the flag the text came from and is carried in the error.
/// Valid JSON that is not an object (an array, a string) is rejected too,
/// since it has no keys to merge.
pub fn parse_object(field: &'static str, raw: &str) -> Result<Payload> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| Error::Parse { field, source })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Parse {
            field,
            source: serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            )),
        }),
    }
}

/// Checks that `raw` is well-formed JSON without changing it.
pub fn validate_json(field: &'static str, raw: &str) -> Result<()> {
    serde_json::from_str::<Value>(raw)
        .map(|_| ())
        .map_err(|source| Error::Parse { field, source })
}

/// Shallow-merges `overlay` into `base`.
///
/// Last write wins: on a key collision the overlay value replaces the base
/// value wholesale, nested objects included. New keys are appended.
pub fn merge(base: &mut Payload, overlay: Payload) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
