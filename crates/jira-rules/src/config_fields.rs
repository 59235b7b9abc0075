//! Build the "create ticket" form descriptors from Jira create metadata

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::models::*;
use crate::utils::get_issue_type_meta;

/// Fields rendered explicitly at the top of the form
pub const STANDARD_FIELDS: &[&str] = &["project", "issuetype", "summary", "description"];

/// Fields that cannot be set from an alert rule
pub const IGNORED_FIELDS: &[&str] = &[
    "attachment",
    "issuelinks",
    "parent",
    "reporter",
    "timetracking",
    "worklog",
];

/// Build the create-ticket descriptors for a project and issue type
///
/// Unknown or missing issue types fall back to the project's first one; the
/// `issuetype` descriptor's default reflects the type actually used.
pub fn build_issue_form_fields(
    meta: &ProjectCreateMeta,
    issue_type: Option<&str>,
) -> Result<Vec<IssueFormField>> {
    let issue_type_meta = get_issue_type_meta(issue_type, meta)?;

    let project_label = if meta.name.is_empty() {
        meta.key.clone()
    } else {
        format!("{} - {}", meta.key, meta.name)
    };

    let mut fields = vec![
        IssueFormField {
            name: "project".to_string(),
            field_type: "select".to_string(),
            label: Some("Jira Project".to_string()),
            required: Some(true),
            default: Some(Value::String(meta.id.clone())),
            choices: Some(vec![Choice::new(meta.id.clone(), project_label)]),
            updates_form: true,
            ..Default::default()
        },
        IssueFormField {
            name: "issuetype".to_string(),
            field_type: "select".to_string(),
            label: Some("Issue Type".to_string()),
            required: Some(true),
            default: Some(Value::String(issue_type_meta.id.clone())),
            choices: Some(
                meta.issuetypes
                    .iter()
                    .map(|t| Choice::new(t.id.clone(), t.name.clone()))
                    .collect(),
            ),
            updates_form: true,
            ..Default::default()
        },
        IssueFormField {
            name: "summary".to_string(),
            field_type: "text".to_string(),
            label: Some("Summary".to_string()),
            required: Some(true),
            ..Default::default()
        },
        IssueFormField {
            name: "description".to_string(),
            field_type: "textarea".to_string(),
            label: Some("Description".to_string()),
            required: Some(false),
            extra: Map::from_iter([("autosize".to_string(), json!(true))]),
            ..Default::default()
        },
    ];

    for (id, field) in &issue_type_meta.fields {
        if STANDARD_FIELDS.contains(&id.as_str()) || IGNORED_FIELDS.contains(&id.as_str()) {
            continue;
        }

        match build_dynamic_field(id, field) {
            Some(descriptor) => fields.push(descriptor),
            None => debug!(field = %id, schema = %field.schema.schema_type, "skipping unsupported field"),
        }
    }

    Ok(fields)
}

/// Descriptor for one issue-type specific field, `None` for unsupported schemas
fn build_dynamic_field(id: &str, field: &FieldMeta) -> Option<IssueFormField> {
    let schema = &field.schema;
    let mut extra = Map::new();

    let field_type = if let Some(values) = &field.allowed_values {
        if schema.schema_type == "array" {
            extra.insert("multiple".to_string(), json!(true));
        }
        return Some(IssueFormField {
            name: id.to_string(),
            field_type: "select".to_string(),
            label: Some(field.name.clone()),
            required: Some(field.required),
            default: default_choice(field),
            choices: Some(
                values
                    .iter()
                    .filter_map(|v| {
                        let value = v.id.clone()?;
                        let label = v.label().unwrap_or(&value).to_string();
                        Some(Choice::new(value, label))
                    })
                    .collect(),
            ),
            extra,
            ..Default::default()
        });
    } else if is_user_schema(schema) {
        // Choices come from the assignable-user search
        if let Some(url) = &field.auto_complete_url {
            extra.insert("url".to_string(), json!(url));
        }
        "select"
    } else if schema.schema_type == "string" {
        match schema.custom.as_deref() {
            Some(custom) if custom.ends_with(":textarea") => "textarea",
            _ => "text",
        }
    } else if schema.schema_type == "array" && schema.items.as_deref() == Some("string") {
        extra.insert("placeholder".to_string(), json!("Comma separated values"));
        "text"
    } else {
        return None;
    };

    Some(IssueFormField {
        name: id.to_string(),
        field_type: field_type.to_string(),
        label: Some(field.name.clone()),
        required: Some(field.required),
        extra,
        ..Default::default()
    })
}

pub(crate) fn is_user_schema(schema: &FieldSchema) -> bool {
    schema.schema_type == "user"
        || (schema.schema_type == "array" && schema.items.as_deref() == Some("user"))
}

/// Id of the field's default allowed value, if Jira advertises one
fn default_choice(field: &FieldMeta) -> Option<Value> {
    if !field.has_default_value {
        return None;
    }
    field
        .default_value
        .as_ref()
        .and_then(|v| v.get("id"))
        .cloned()
}
