//! In-memory Jira implementing JiraApi

use jira_rules::{
    CreateJiraIssue, CreateMeta, CreatedIssue, ExternalIssue, JiraApi, JiraError, JiraIssue,
    JiraIssueFields, JiraIssueType, JiraProjectRef, JiraUser, ProjectCreateMeta, Result,
    UserIdField,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// First issue number handed out per project
const FIRST_ISSUE_NUMBER: u64 = 123;

/// One recorded call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockCall {
    pub method: String,
    pub args: Value,
}

#[derive(Default)]
struct MockState {
    issues: Vec<JiraIssue>,
    calls: Vec<MockCall>,
}

/// A Jira stand-in that keeps created issues in memory
pub struct MockJira {
    projects: Vec<ProjectCreateMeta>,
    users: Vec<JiraUser>,
    user_id_field: UserIdField,
    state: Mutex<MockState>,
}

impl Default for MockJira {
    fn default() -> Self {
        Self::new()
    }
}

impl MockJira {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            users: Vec::new(),
            user_id_field: UserIdField::AccountId,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Load `createmeta.json` and, if present, `users.json` from a fixture directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let meta: CreateMeta = read_fixture(&dir.join("createmeta.json"))?;
        let users_path = dir.join("users.json");
        let users: Vec<JiraUser> = if users_path.exists() {
            read_fixture(&users_path)?
        } else {
            Vec::new()
        };

        Ok(Self::new().with_create_meta(meta).with_users(users))
    }

    pub fn with_project(mut self, project: ProjectCreateMeta) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_create_meta(mut self, meta: CreateMeta) -> Self {
        self.projects.extend(meta.projects);
        self
    }

    pub fn with_users(mut self, users: Vec<JiraUser>) -> Self {
        self.users.extend(users);
        self
    }

    pub fn with_user_id_field(mut self, field: UserIdField) -> Self {
        self.user_id_field = field;
        self
    }

    /// Seed issues that were created by earlier runs
    ///
    /// The mock only lives for one process; replaying the link registry lets
    /// later runs fetch those tickets and keeps new keys from colliding with
    /// them. Links whose key names an unknown project are skipped.
    pub fn with_linked_issues<'a>(self, linked: impl IntoIterator<Item = &'a ExternalIssue>) -> Self {
        {
            let mut state = self.state();
            for link in linked {
                if state.issues.iter().any(|i| i.key == link.key) {
                    continue;
                }
                let Some(project) = project_key(&link.key).and_then(|k| self.find_project(k)) else {
                    debug!(key = %link.key, "skipping link for unknown mock project");
                    continue;
                };
                let id = (10000 + state.issues.len() + 1).to_string();
                state.issues.push(JiraIssue {
                    id,
                    key: link.key.clone(),
                    self_url: None,
                    fields: JiraIssueFields {
                        summary: link.title.clone(),
                        description: None,
                        status: None,
                        issuetype: None,
                        project: Some(project_ref(project)),
                        labels: Vec::new(),
                        created: Some(link.created_at.to_rfc3339()),
                    },
                });
            }
        }
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, method: &str, args: Value) {
        trace!(method, %args, "mock jira call");
        self.state().calls.push(MockCall {
            method: method.to_string(),
            args,
        });
    }

    fn find_project(&self, project: &str) -> Option<&ProjectCreateMeta> {
        self.projects
            .iter()
            .find(|p| p.key == project || p.id == project)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Number of calls made to one method
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Issues created through this mock
    pub fn created_issues(&self) -> Vec<JiraIssue> {
        self.state().issues.clone()
    }
}

fn read_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn project_key(issue_key: &str) -> Option<&str> {
    issue_key.rsplit_once('-').map(|(project, _)| project)
}

fn issue_number(issue_key: &str) -> Option<u64> {
    issue_key.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
}

fn project_ref(project: &ProjectCreateMeta) -> JiraProjectRef {
    JiraProjectRef {
        id: project.id.clone(),
        key: project.key.clone(),
        name: Some(project.name.clone()),
    }
}

fn field_str(issue: &CreateJiraIssue, name: &str) -> Option<String> {
    issue.fields.get(name).and_then(Value::as_str).map(String::from)
}

fn field_id(issue: &CreateJiraIssue, name: &str) -> Option<String> {
    issue
        .fields
        .get(name)
        .and_then(|v| v.get("id"))
        .and_then(Value::as_str)
        .map(String::from)
}

impl JiraApi for MockJira {
    fn get_create_meta(&self, project: &str) -> Result<ProjectCreateMeta> {
        self.record("get_create_meta", json!({ "project": project }));
        self.find_project(project)
            .cloned()
            .ok_or_else(|| JiraError::ProjectNotFound(project.to_string()))
    }

    fn create_issue(&self, issue: &CreateJiraIssue) -> Result<CreatedIssue> {
        self.record("create_issue", serde_json::to_value(issue)?);

        let project_id = field_id(issue, "project")
            .ok_or_else(|| JiraError::InvalidInput("project is required".to_string()))?;
        let project = self
            .find_project(&project_id)
            .ok_or_else(|| JiraError::ProjectNotFound(project_id.clone()))?;
        let summary = field_str(issue, "summary")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| JiraError::Api {
                status: 400,
                message: "summary: You must specify a summary of the issue.".to_string(),
            })?;

        let issue_type = field_id(issue, "issuetype").and_then(|id| {
            project
                .issuetypes
                .iter()
                .find(|t| t.id == id)
                .map(|t| JiraIssueType {
                    id: Some(t.id.clone()),
                    name: t.name.clone(),
                })
        });
        let labels = issue
            .fields
            .get("labels")
            .and_then(Value::as_array)
            .map(|ls| ls.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();

        let mut state = self.state();
        let number = state
            .issues
            .iter()
            .filter(|i| i.fields.project.as_ref().map(|p| p.id.as_str()) == Some(project.id.as_str()))
            .filter_map(|i| issue_number(&i.key))
            .max()
            .map_or(FIRST_ISSUE_NUMBER, |n| n + 1);
        let id = (10000 + state.issues.len() + 1).to_string();
        let key = format!("{}-{}", project.key, number);

        state.issues.push(JiraIssue {
            id: id.clone(),
            key: key.clone(),
            self_url: None,
            fields: JiraIssueFields {
                summary,
                description: field_str(issue, "description"),
                status: None,
                issuetype: issue_type,
                project: Some(project_ref(project)),
                labels,
                created: None,
            },
        });

        Ok(CreatedIssue {
            id,
            key,
            self_url: None,
        })
    }

    fn get_issue(&self, key: &str) -> Result<JiraIssue> {
        self.record("get_issue", json!({ "key": key }));
        self.state()
            .issues
            .iter()
            .find(|i| i.key == key || i.id == key)
            .cloned()
            .ok_or_else(|| JiraError::IssueNotFound(key.to_string()))
    }

    fn search_assignable_users(&self, project: &str, query: Option<&str>) -> Result<Vec<JiraUser>> {
        self.record(
            "search_assignable_users",
            json!({ "project": project, "query": query }),
        );
        if self.find_project(project).is_none() {
            return Err(JiraError::ProjectNotFound(project.to_string()));
        }

        let query = query.map(str::to_lowercase).filter(|q| !q.is_empty());
        Ok(self
            .users
            .iter()
            .filter(|u| match &query {
                Some(q) => [&u.display_name, &u.name, &u.email_address]
                    .into_iter()
                    .flatten()
                    .any(|v| v.to_lowercase().contains(q.as_str())),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn user_id_field(&self) -> UserIdField {
        self.user_id_field.clone()
    }
}
