use crate::cli::OutputFormat;
use colored::Colorize;
use jira_rules::{Choice, FieldSchemaMap, FormField, JiraIssue, TicketOutcome};
use serde::Serialize;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", item.display());
            }
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for JiraIssue {
    fn display(&self) -> String {
        let mut output = format!(
            "{} - {}",
            self.key.cyan().bold(),
            self.fields.summary.white().bold()
        );

        if let Some(project) = &self.fields.project {
            output.push_str(&format!("\n  {}: {}", "Project".dimmed(), project.key));
        }
        if let Some(issue_type) = &self.fields.issuetype {
            output.push_str(&format!("\n  {}: {}", "Type".dimmed(), issue_type.name));
        }
        if let Some(status) = &self.fields.status {
            output.push_str(&format!("\n  {}: {}", "Status".dimmed(), status.name));
        }
        if !self.fields.labels.is_empty() {
            let labels: Vec<String> = self
                .fields
                .labels
                .iter()
                .map(|l| l.magenta().to_string())
                .collect();
            output.push_str(&format!("\n  {}: {}", "Labels".dimmed(), labels.join(", ")));
        }
        if let Some(desc) = self.fields.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n  {}: {}", "Description".dimmed(), desc));
        }

        output
    }
}

impl Displayable for Choice {
    fn display(&self) -> String {
        format!("{:<28} {}", self.value().cyan(), self.label())
    }
}

impl Displayable for FormField {
    fn display(&self) -> String {
        let required = if self.required == Some(true) {
            " (required)".yellow().to_string()
        } else {
            String::new()
        };
        let mut output = format!(
            "{} [{}]{}",
            self.label.as_deref().unwrap_or(&self.name).bold(),
            self.field_type.to_string().dimmed(),
            required
        );
        if self.label.is_some() {
            output.push_str(&format!("\n  {}: {}", "Name".dimmed(), self.name));
        }
        if let Some(default) = &self.default {
            output.push_str(&format!("\n  {}: {}", "Default".dimmed(), default));
        }
        if let Some(choices) = self.choices.as_ref().filter(|c| !c.is_empty()) {
            let labels: Vec<&str> = choices.iter().map(Choice::label).collect();
            output.push_str(&format!("\n  {}: {}", "Choices".dimmed(), labels.join(", ")));
        }
        output
    }
}

impl Displayable for FieldSchemaMap {
    fn display(&self) -> String {
        if self.is_empty() {
            return "No fields.".to_string();
        }
        self.values()
            .map(Displayable::display)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Displayable for TicketOutcome {
    fn display(&self) -> String {
        let issue = self.issue();
        match self {
            TicketOutcome::Created(_) => format!(
                "{} {} for group {}",
                "Created".green().bold(),
                issue.key.cyan().bold(),
                issue.group_id
            ),
            TicketOutcome::AlreadyLinked(_) => format!(
                "{} group {} is already linked to {}",
                "Skipped:".yellow().bold(),
                issue.group_id,
                issue.key.cyan().bold()
            ),
        }
    }
}
