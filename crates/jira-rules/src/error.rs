use thiserror::Error;

#[derive(Error, Debug)]
pub enum JiraError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// The create metadata for a project lists no issue types at all
    #[error("No issue types available for project {0}")]
    NoIssueTypes(String),

    #[error("Rule targets integration {rule} but the action runs for integration {action}")]
    IntegrationMismatch { rule: u64, action: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, JiraError>;
