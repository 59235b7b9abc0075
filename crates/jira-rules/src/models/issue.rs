use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Jira issue
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssue {
    /// Internal numeric ID
    pub id: String,
    /// Issue key (e.g., "APP-123")
    pub key: String,
    /// Self URL
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    /// Issue fields
    pub fields: JiraIssueFields,
}

/// Issue fields container
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueFields {
    /// Issue summary/title
    pub summary: String,
    /// Plain-text description (REST API v2)
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<JiraStatus>,
    #[serde(default)]
    pub issuetype: Option<JiraIssueType>,
    #[serde(default)]
    pub project: Option<JiraProjectRef>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraStatus {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraIssueType {
    pub id: Option<String>,
    pub name: String,
}

/// Project reference (used in issue responses)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraProjectRef {
    pub id: String,
    pub key: String,
    pub name: Option<String>,
}

/// Request to create an issue
///
/// Fields are keyed by Jira field id; the set depends on the issue type's
/// create screen, so the payload is kept as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateJiraIssue {
    pub fields: Map<String, Value>,
}

/// Minimal response Jira returns on issue creation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
}

/// Link between an alerting group and the Jira ticket created for it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExternalIssue {
    pub integration_id: u64,
    pub group_id: u64,
    /// Jira issue key
    pub key: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
