use crate::cli::OutputFormat;
use crate::output::output_result;
use anyhow::{Context, Result};
use jira_rules::JiraApi;

pub fn handle_get(client: &dyn JiraApi, key: &str, format: OutputFormat) -> Result<()> {
    let issue = client
        .get_issue(key)
        .with_context(|| format!("Failed to fetch issue '{}'", key))?;

    output_result(&issue, format);
    Ok(())
}
