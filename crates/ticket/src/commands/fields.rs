//! Form field and user choice handlers

use crate::cli::OutputFormat;
use crate::output::{output_list, output_result};
use anyhow::{Context, Result};
use jira_rules::{CreateTicketAction, Integration, JiraApi};

pub fn handle_fields(
    client: &dyn JiraApi,
    integration: &Integration,
    project: &str,
    issue_type: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let action = CreateTicketAction::new(client, integration);
    let fields = action
        .form_fields(project, issue_type)
        .with_context(|| format!("Failed to load form fields for project '{}'", project))?;

    output_result(&fields, format);
    Ok(())
}

pub fn handle_users(
    client: &dyn JiraApi,
    integration: &Integration,
    project: &str,
    query: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let action = CreateTicketAction::new(client, integration);
    let choices = action
        .user_choices(project, query)
        .with_context(|| format!("Failed to search users in project '{}'", project))?;

    if choices.is_empty() && format == OutputFormat::Text {
        println!("No assignable users found.");
        return Ok(());
    }

    output_list(&choices, format);
    Ok(())
}
