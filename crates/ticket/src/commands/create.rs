//! Create-ticket rule trigger

use crate::cli::OutputFormat;
use crate::output::output_result;
use anyhow::{Context, Result};
use jira_rules::{
    CreateTicketAction, ExternalIssueRegistry, Integration, JiraApi, TicketEvent, TicketRule,
};
use std::path::Path;

pub fn load_rule(path: &Path) -> Result<TicketRule> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid rule file {}", path.display()))
}

pub fn handle_create(
    client: &dyn JiraApi,
    integration: &Integration,
    rule_path: &Path,
    event: &TicketEvent,
    registry_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let rule = load_rule(rule_path)?;
    let mut registry = ExternalIssueRegistry::load(registry_path)
        .with_context(|| format!("Failed to load registry {}", registry_path.display()))?;

    let action = CreateTicketAction::new(client, integration);
    let outcome = action
        .trigger(&rule, event, &mut registry)
        .context("Failed to create ticket")?;

    if outcome.is_created() {
        registry
            .save(registry_path)
            .with_context(|| format!("Failed to save registry {}", registry_path.display()))?;
    }

    output_result(&outcome, format);
    Ok(())
}
