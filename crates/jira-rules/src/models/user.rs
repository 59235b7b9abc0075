use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::de::{opt_string_or_number, scalar_to_string};
use crate::error::JiraError;

/// Jira user resource as returned by the user search endpoints
///
/// Jira Cloud identifies users by `accountId` and may leave `name` blank,
/// while Jira Server identifies them by `name` (or `key`). Identifiers may
/// arrive as numbers and are kept as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    /// Account ID (Jira Cloud)
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<String>,
    /// User key (Jira Server)
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Username (Jira Server, usually blank on Cloud)
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Email address (may be hidden by privacy settings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// Whether the user is active
    #[serde(default)]
    pub active: bool,
    /// Remaining attributes (`self`, `avatarUrls`, custom id keys, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which user attribute carries the unique identifier
///
/// The three keys Jira itself uses have their own variants; any other key
/// is looked up among the user's remaining attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum UserIdField {
    #[default]
    AccountId,
    Key,
    Name,
    Other(String),
}

impl UserIdField {
    /// Raw JSON key name of this identifier
    pub fn as_str(&self) -> &str {
        match self {
            UserIdField::AccountId => "accountId",
            UserIdField::Key => "key",
            UserIdField::Name => "name",
            UserIdField::Other(key) => key,
        }
    }

    /// Read this identifier from a user, if present
    ///
    /// Numeric identifiers come back in their string form.
    pub fn value_of(&self, user: &JiraUser) -> Option<String> {
        match self {
            UserIdField::AccountId => user.account_id.clone(),
            UserIdField::Key => user.key.clone(),
            UserIdField::Name => user.name.clone(),
            UserIdField::Other(key) => user.extra.get(key).and_then(scalar_to_string),
        }
    }
}

impl From<String> for UserIdField {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "accountId" => UserIdField::AccountId,
            "key" => UserIdField::Key,
            "name" => UserIdField::Name,
            _ => UserIdField::Other(raw),
        }
    }
}

impl From<UserIdField> for String {
    fn from(field: UserIdField) -> Self {
        match field {
            UserIdField::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UserIdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserIdField {
    type Err = JiraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(JiraError::InvalidInput("User id field must not be empty".to_string()));
        }
        Ok(UserIdField::from(s.to_string()))
    }
}
