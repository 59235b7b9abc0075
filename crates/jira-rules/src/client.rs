use base64::Engine;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use ureq::Agent;

use crate::error::{JiraError, Result};
use crate::models::*;

/// Fields requested when fetching an issue
const ISSUE_FIELDS: &[&str] = &[
    "summary",
    "description",
    "status",
    "issuetype",
    "project",
    "labels",
    "created",
];

/// Deployment flavor of the Jira instance
///
/// Cloud identifies users by account id, Server by username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JiraFlavor {
    #[default]
    Cloud,
    Server,
}

impl JiraFlavor {
    pub fn user_id_field(&self) -> UserIdField {
        match self {
            JiraFlavor::Cloud => UserIdField::AccountId,
            JiraFlavor::Server => UserIdField::Name,
        }
    }
}

/// Jira REST API client
pub struct JiraClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
    flavor: JiraFlavor,
}

impl JiraClient {
    /// Create a new Jira client with Basic Auth
    ///
    /// For Jira Cloud, use your email and an API token.
    /// For Jira Server, use your username and password.
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            // Don't treat HTTP errors as errors - we'll handle them ourselves
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = format!("{}:{}", email, api_token);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        let auth_header = format!("Basic {}", encoded);

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            flavor: JiraFlavor::default(),
        }
    }

    pub fn with_flavor(mut self, flavor: JiraFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn flavor(&self) -> JiraFlavor {
        self.flavor
    }

    /// REST API v2 URL; v2 takes plain-text descriptions on both Cloud and Server
    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/2{}", self.base_url, path)
    }

    /// Handle HTTP errors
    fn handle_error(&self, err: ureq::Error) -> JiraError {
        match &err {
            ureq::Error::StatusCode(401) => JiraError::Unauthorized,
            ureq::Error::StatusCode(status) => JiraError::Api {
                status: *status,
                message: format!("HTTP {}", status),
            },
            _ => JiraError::Http(err),
        }
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Jira error format: {"errorMessages":["..."], "errors":{...}}
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            let mut messages = Vec::new();

            if let Some(errors) = error_response
                .get("errorMessages")
                .and_then(|e| e.as_array())
            {
                messages.extend(errors.iter().filter_map(|e| e.as_str()).map(String::from));
            }

            if let Some(errors) = error_response.get("errors").and_then(|e| e.as_object()) {
                for (field, msg) in errors {
                    if let Some(s) = msg.as_str() {
                        messages.push(format!("{}: {}", field, s));
                    }
                }
            }

            if messages.is_empty() {
                body
            } else {
                messages.join("; ")
            }
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        debug!(status, %message, "jira request failed");

        if status == 401 {
            Err(JiraError::Unauthorized)
        } else {
            Err(JiraError::Api { status, message })
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        trace!(url, "GET");

        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| self.handle_error(e))?;

        let mut response = self.check_response(response)?;
        Ok(response.body_mut().read_json()?)
    }

    // ==================== Create Metadata ====================

    /// Get create metadata for a project, by key or numeric id
    pub fn get_create_meta(&self, project: &str) -> Result<ProjectCreateMeta> {
        let selector = if project.chars().all(|c| c.is_ascii_digit()) {
            "projectIds"
        } else {
            "projectKeys"
        };
        let url = format!(
            "{}?{}={}&expand=projects.issuetypes.fields",
            self.api_url("/issue/createmeta"),
            selector,
            urlencoding::encode(project)
        );

        let meta: CreateMeta = self.get_json(&url)?;
        debug!(project, projects = meta.projects.len(), "fetched create metadata");

        meta.projects
            .into_iter()
            .find(|p| p.key == project || p.id == project)
            .ok_or_else(|| JiraError::ProjectNotFound(project.to_string()))
    }

    // ==================== Issue Operations ====================

    /// Get an issue by key or ID
    pub fn get_issue(&self, key: &str) -> Result<JiraIssue> {
        let url = format!(
            "{}?fields={}",
            self.api_url(&format!("/issue/{}", urlencoding::encode(key))),
            ISSUE_FIELDS.join(",")
        );

        self.get_json(&url).map_err(|e| match e {
            JiraError::Api { status: 404, .. } => JiraError::IssueNotFound(key.to_string()),
            other => other,
        })
    }

    /// Create a new issue
    ///
    /// Jira answers with the new issue's id and key only.
    pub fn create_issue(&self, issue: &CreateJiraIssue) -> Result<CreatedIssue> {
        let url = self.api_url("/issue");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send_json(issue)
            .map_err(|e| self.handle_error(e))?;

        let mut response = self.check_response(response)?;
        let created: CreatedIssue = response.body_mut().read_json()?;
        debug!(key = %created.key, "created jira issue");
        Ok(created)
    }

    // ==================== User Operations ====================

    /// List users assignable to issues in a project
    pub fn search_assignable_users(
        &self,
        project: &str,
        query: Option<&str>,
    ) -> Result<Vec<JiraUser>> {
        let mut url = format!(
            "{}?project={}",
            self.api_url("/user/assignable/search"),
            urlencoding::encode(project)
        );

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            // Server still takes the legacy `username` parameter
            let param = match self.flavor {
                JiraFlavor::Cloud => "query",
                JiraFlavor::Server => "username",
            };
            url.push_str(&format!("&{}={}", param, urlencoding::encode(query)));
        }

        self.get_json(&url)
    }
}
