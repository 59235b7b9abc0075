use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An installed integration as stored by the alerting application
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Integration {
    pub id: u64,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: IntegrationMetadata,
}

fn default_provider() -> String {
    "jira".to_string()
}

/// Provider metadata saved at installation time
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct IntegrationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_client_id: Option<String>,
    /// Only present on installations made with the legacy bot flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_access_token: Option<String>,
    /// Explicit installation type, overrides the inferred one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How an integration was authorized
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum InstallationType {
    ClassicBot,
    WorkspaceApp,
    Other(String),
}

impl InstallationType {
    pub fn as_str(&self) -> &str {
        match self {
            InstallationType::ClassicBot => "classic_bot",
            InstallationType::WorkspaceApp => "workspace_app",
            InstallationType::Other(raw) => raw,
        }
    }
}

impl From<String> for InstallationType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "classic_bot" => InstallationType::ClassicBot,
            "workspace_app" => InstallationType::WorkspaceApp,
            _ => InstallationType::Other(raw),
        }
    }
}

impl From<InstallationType> for String {
    fn from(kind: InstallationType) -> Self {
        match kind {
            InstallationType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InstallationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
