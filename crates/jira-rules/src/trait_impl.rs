//! Implementation of [`JiraApi`] for JiraClient

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::*;
use crate::traits::JiraApi;

impl JiraApi for JiraClient {
    fn get_create_meta(&self, project: &str) -> Result<ProjectCreateMeta> {
        self.get_create_meta(project)
    }

    fn create_issue(&self, issue: &CreateJiraIssue) -> Result<CreatedIssue> {
        self.create_issue(issue)
    }

    fn get_issue(&self, key: &str) -> Result<JiraIssue> {
        self.get_issue(key)
    }

    fn search_assignable_users(&self, project: &str, query: Option<&str>) -> Result<Vec<JiraUser>> {
        self.search_assignable_users(project, query)
    }

    fn user_id_field(&self) -> UserIdField {
        self.flavor().user_id_field()
    }
}
