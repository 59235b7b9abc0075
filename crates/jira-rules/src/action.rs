//! Alert-rule action that opens a Jira ticket for an alerting group

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::config_fields::{build_issue_form_fields, is_user_schema, IGNORED_FIELDS, STANDARD_FIELDS};
use crate::error::{JiraError, Result};
use crate::models::*;
use crate::registry::ExternalIssueRegistry;
use crate::traits::JiraApi;
use crate::utils::{
    build_user_choice, get_integration_type, get_issue_type_meta,
    transform_jira_choices_to_strings, transform_jira_fields_to_form_fields,
};

/// Saved configuration of a "create Jira ticket" rule action
///
/// Choice fields hold the labels the user picked in the form; every field
/// other than the ones below lands in `fields`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TicketRule {
    #[serde(rename = "integration")]
    pub integration_id: u64,
    pub project: String,
    #[serde(default, alias = "issueType", skip_serializing_if = "Option::is_none")]
    pub issuetype: Option<String>,
    /// Action class identifier stored alongside the rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: FormData,
}

/// The alerting event a rule fired for
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TicketEvent {
    pub group_id: u64,
    pub title: String,
    #[serde(default)]
    pub culprit: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Link back to the group in the alerting application
    #[serde(default)]
    pub url: Option<String>,
}

impl TicketEvent {
    fn default_description(&self) -> String {
        let mut parts = Vec::new();
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            parts.push(message.to_string());
        }
        if let Some(culprit) = self.culprit.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("Culprit: {}", culprit));
        }
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            parts.push(url.to_string());
        }
        parts.join("\n\n")
    }
}

/// Result of triggering the action for an event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TicketOutcome {
    /// A new ticket was created and linked to the group
    Created(ExternalIssue),
    /// The group already had a ticket; Jira was not called
    AlreadyLinked(ExternalIssue),
}

impl TicketOutcome {
    pub fn issue(&self) -> &ExternalIssue {
        match self {
            TicketOutcome::Created(issue) | TicketOutcome::AlreadyLinked(issue) => issue,
        }
    }

    pub fn key(&self) -> &str {
        &self.issue().key
    }

    pub fn is_created(&self) -> bool {
        matches!(self, TicketOutcome::Created(_))
    }
}

/// Creates Jira tickets for alerting groups through one integration
pub struct CreateTicketAction<'a> {
    client: &'a dyn JiraApi,
    integration: &'a Integration,
}

impl<'a> CreateTicketAction<'a> {
    pub fn new(client: &'a dyn JiraApi, integration: &'a Integration) -> Self {
        Self {
            client,
            integration,
        }
    }

    /// Form fields offered when configuring the action for a project
    pub fn form_fields(&self, project: &str, issue_type: Option<&str>) -> Result<FieldSchemaMap> {
        let meta = self.client.get_create_meta(project)?;
        let issue_type = resolve_issue_type(&meta, issue_type);
        let descriptors = build_issue_form_fields(&meta, issue_type)?;
        Ok(transform_jira_fields_to_form_fields(&descriptors))
    }

    /// Assignable users of a project as form choices
    ///
    /// Users without the deployment's identifier are left out.
    pub fn user_choices(&self, project: &str, query: Option<&str>) -> Result<Vec<Choice>> {
        let id_field = self.client.user_id_field();
        let users = self.client.search_assignable_users(project, query)?;
        Ok(users
            .iter()
            .filter_map(|u| build_user_choice(u, &id_field))
            .collect())
    }

    /// Open a ticket for the event's group unless one is already linked
    pub fn trigger(
        &self,
        rule: &TicketRule,
        event: &TicketEvent,
        registry: &mut ExternalIssueRegistry,
    ) -> Result<TicketOutcome> {
        if rule.integration_id != self.integration.id {
            return Err(JiraError::IntegrationMismatch {
                rule: rule.integration_id,
                action: self.integration.id,
            });
        }

        if let Some(existing) = registry.get(self.integration.id, event.group_id) {
            debug!(key = %existing.key, group_id = event.group_id, "group already has a ticket");
            return Ok(TicketOutcome::AlreadyLinked(existing.clone()));
        }

        let meta = self.client.get_create_meta(&rule.project)?;
        let issue_type = get_issue_type_meta(resolve_issue_type(&meta, rule.issuetype.as_deref()), &meta)?;

        let descriptors = build_issue_form_fields(&meta, Some(&issue_type.id))?;
        let form = transform_jira_fields_to_form_fields(&descriptors);
        let data = transform_jira_choices_to_strings(&form, &rule.fields);

        let payload =
            build_create_payload(&meta, issue_type, &data, event, &self.client.user_id_field())?;
        let summary = payload
            .fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or(&event.title)
            .to_string();

        let created = self.client.create_issue(&payload)?;
        info!(
            key = %created.key,
            group_id = event.group_id,
            installation_type = %get_integration_type(self.integration),
            "created jira ticket"
        );

        let linked = registry.link(self.integration.id, event.group_id, &created.key, &summary);
        Ok(TicketOutcome::Created(linked.clone()))
    }
}

/// Issue type id for an id or a display name; unknown values are returned as given
fn resolve_issue_type<'m>(meta: &'m ProjectCreateMeta, issue_type: Option<&'m str>) -> Option<&'m str> {
    let wanted = issue_type?;
    meta.issuetypes
        .iter()
        .find(|t| t.id == wanted)
        .or_else(|| meta.issuetypes.iter().find(|t| t.name == wanted))
        .map(|t| t.id.as_str())
        .or(Some(wanted))
}

/// Shape resolved form data into Jira's create payload
///
/// Summary and description fall back to the event. Only fields present on
/// the issue type's create screen are sent. A value its field cannot hold
/// is an [`JiraError::InvalidInput`] naming the field.
pub fn build_create_payload(
    meta: &ProjectCreateMeta,
    issue_type: &IssueTypeMeta,
    data: &FormData,
    event: &TicketEvent,
    user_id_field: &UserIdField,
) -> Result<CreateJiraIssue> {
    let mut fields = Map::new();
    fields.insert("project".to_string(), keyed("id", Value::String(meta.id.clone())));
    fields.insert(
        "issuetype".to_string(),
        keyed("id", Value::String(issue_type.id.clone())),
    );

    let summary = non_blank_str(data.get("summary")).unwrap_or(&event.title);
    fields.insert("summary".to_string(), Value::String(summary.to_string()));

    let description = non_blank_str(data.get("description"))
        .map(str::to_string)
        .unwrap_or_else(|| event.default_description());
    if !description.is_empty() {
        fields.insert("description".to_string(), Value::String(description));
    }

    for (id, field) in &issue_type.fields {
        if STANDARD_FIELDS.contains(&id.as_str()) || IGNORED_FIELDS.contains(&id.as_str()) {
            continue;
        }
        let Some(submitted) = data.get(id) else {
            continue;
        };
        if let Some(value) = shape_value(id, field, submitted, user_id_field)? {
            fields.insert(id.clone(), value);
        }
    }

    Ok(CreateJiraIssue { fields })
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn keyed(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}

/// Convert one submitted value to the representation its Jira field expects
///
/// `Ok(None)` means the value is blank and the field is left out.
fn shape_value(
    id: &str,
    field: &FieldMeta,
    value: &Value,
    user_id_field: &UserIdField,
) -> Result<Option<Value>> {
    match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        _ => {}
    }

    let schema = &field.schema;

    if schema.schema_type == "array" {
        let items: Vec<Value> = match value {
            Value::Array(items) => items.clone(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
            other => vec![other.clone()],
        };
        let shaped = items
            .into_iter()
            .map(|item| match schema.items.as_deref() {
                Some("string") => item,
                Some("user") => keyed(user_id_field.as_str(), item),
                _ => keyed("id", item),
            })
            .collect();
        return Ok(Some(Value::Array(shaped)));
    }

    if is_user_schema(schema) {
        return Ok(Some(keyed(user_id_field.as_str(), value.clone())));
    }

    if field.allowed_values.is_some() {
        return Ok(Some(keyed("id", value.clone())));
    }

    match (schema.schema_type.as_str(), value) {
        ("number", Value::Number(_)) => Ok(Some(value.clone())),
        ("number", Value::String(s)) => parse_number(s.trim())
            .map(|n| Some(Value::Number(n)))
            .ok_or_else(|| {
                JiraError::InvalidInput(format!("Field '{}' expects a number, got '{}'", id, s))
            }),
        ("number", other) => Err(JiraError::InvalidInput(format!(
            "Field '{}' expects a number, got {}",
            id, other
        ))),
        _ => Ok(Some(value.clone())),
    }
}

/// Integers stay exact; only non-integral input goes through `f64`
fn parse_number(raw: &str) -> Option<Number> {
    raw.parse::<i64>()
        .map(Number::from)
        .or_else(|_| raw.parse::<u64>().map(Number::from))
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64))
}
