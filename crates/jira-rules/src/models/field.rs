use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A `(value, label)` pair offered by a choice field
///
/// Serialized as a two-element JSON array, the shape the alert-rule form uses.
/// Numeric values are accepted and kept in their string form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice(
    #[serde(deserialize_with = "super::de::string_or_number")] pub String,
    pub String,
);

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self(value.into(), label.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

/// Field type tag understood by the alert-rule form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Choice,
    String,
    Other(String),
}

impl FieldType {
    /// Map a Jira-side type name onto the form vocabulary
    ///
    /// `select` becomes `choice` and `text` becomes `string`; every other
    /// name is kept as is.
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "select" => FieldType::Choice,
            "text" => FieldType::String,
            other => FieldType::from(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Choice => "choice",
            FieldType::String => "string",
            FieldType::Other(raw) => raw,
        }
    }
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "choice" => FieldType::Choice,
            "string" => FieldType::String,
            _ => FieldType::Other(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "Create ticket" field descriptor in Jira's vocabulary
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFormField {
    /// Field name; descriptors with an empty name are not rendered
    #[serde(default)]
    pub name: String,
    /// Raw type name (`select`, `text`, `textarea`, `blank`, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    /// Whether changing this field reloads the form; never forwarded to the form
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub updates_form: bool,
    /// Any other attribute, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field descriptor in the alert-rule form's vocabulary
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FormField {
    pub fn is_choice(&self) -> bool {
        self.field_type == FieldType::Choice
    }

    /// Underlying value for a display label, if one of the choices carries it
    ///
    /// When several choices share a label the last one wins.
    pub fn choice_value(&self, label: &str) -> Option<&str> {
        self.choices
            .iter()
            .flatten()
            .rev()
            .find(|c| c.label() == label)
            .map(Choice::value)
    }
}

/// Form fields keyed by field name
pub type FieldSchemaMap = BTreeMap<String, FormField>;

/// Submitted form values keyed by field name
pub type FormData = Map<String, Value>;
