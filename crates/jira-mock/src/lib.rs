//! Mock Jira for create-ticket rule tests
//!
//! [`MockJira`] implements [`jira_rules::JiraApi`] in memory. It is seeded with
//! create metadata and users, either from code or from a fixture directory,
//! and records every call so tests can assert which Jira operations ran.
//!
//! # Fixture directory
//!
//! ```text
//! fixtures/jira/
//! ├── createmeta.json    # GET /issue/createmeta response (projects expanded)
//! └── users.json         # optional, assignable users
//! ```
//!
//! Point the `ticket` CLI at such a directory with `JIRA_MOCK_DIR`.

mod client;

pub use client::{MockCall, MockJira};

/// Environment variable to enable mock mode
pub const MOCK_DIR_ENV: &str = "JIRA_MOCK_DIR";

/// Get the mock directory from environment, if set
pub fn get_mock_dir() -> Option<std::path::PathBuf> {
    std::env::var_os(MOCK_DIR_ENV).map(std::path::PathBuf::from)
}
