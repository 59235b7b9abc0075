//! Lenient deserializers for identifiers Jira sends as either strings or numbers

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String form of a scalar identifier, `None` for anything else
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a string or number, found {}", value)))
}

/// Like [`string_or_number`], with `null` read as absent
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value).map(Some).ok_or_else(|| {
            D::Error::custom(format!("expected a string or number, found {}", value))
        }),
    }
}
