use crate::error::Result;
use crate::models::*;

/// Jira operations needed by the create-ticket rule action
///
/// Implemented by [`crate::JiraClient`] for real instances and by mock
/// clients in tests.
pub trait JiraApi: Send + Sync {
    /// Create metadata (issue types and their fields) for a project key or id
    fn get_create_meta(&self, project: &str) -> Result<ProjectCreateMeta>;

    /// Create an issue
    fn create_issue(&self, issue: &CreateJiraIssue) -> Result<CreatedIssue>;

    /// Get an issue by key or id
    fn get_issue(&self, key: &str) -> Result<JiraIssue>;

    /// Users that can be assigned issues in a project, optionally filtered
    fn search_assignable_users(&self, project: &str, query: Option<&str>) -> Result<Vec<JiraUser>>;

    /// Attribute identifying users on this deployment
    fn user_id_field(&self) -> UserIdField {
        UserIdField::AccountId
    }
}
