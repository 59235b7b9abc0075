//! Adapters between Jira REST payloads and the alert-rule form
//!
//! Everything here is a pure function over already-fetched data.

use serde_json::Value;

use crate::error::{JiraError, Result};
use crate::models::*;

/// Build a `(id, label)` choice from a Jira user resource
///
/// Returns `None` when the user lacks the identifier selected by `id_field`.
/// `name` may be blank on Jira Cloud, in which case it is left out of the label.
pub fn build_user_choice(user: &JiraUser, id_field: &UserIdField) -> Option<Choice> {
    let id = id_field.value_of(user)?;

    let name = user.name.as_deref().unwrap_or("");
    let display = user.display_name.as_deref().unwrap_or(name);
    let email = user
        .email_address
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(|e| format!("- {} ", e))
        .unwrap_or_default();
    let name_part = if name.is_empty() {
        String::new()
    } else {
        format!("({})", name)
    };

    let label = format!("{} {}{}", display, email, name_part);
    Some(Choice::new(id, label.trim()))
}

/// Key Jira's "create ticket" descriptors by name, in the form's vocabulary
///
/// Nameless descriptors are dropped, `updatesForm` is stripped and the type
/// is normalized with [`FieldType::normalize`]. A later descriptor replaces an
/// earlier one with the same name.
pub fn transform_jira_fields_to_form_fields(fields: &[IssueFormField]) -> FieldSchemaMap {
    let mut form_fields = FieldSchemaMap::new();

    for field in fields.iter().filter(|f| !f.name.is_empty()) {
        form_fields.insert(
            field.name.clone(),
            FormField {
                name: field.name.clone(),
                field_type: FieldType::normalize(&field.field_type),
                label: field.label.clone(),
                required: field.required,
                default: field.default.clone(),
                choices: field.choices.clone(),
                extra: field.extra.clone(),
            },
        );
    }

    form_fields
}

/// Replace choice labels in submitted form data with the underlying values
///
/// Only keys naming a `choice` field are rewritten, and only when the value
/// matches one of that field's labels. Everything else is copied as is.
pub fn transform_jira_choices_to_strings(fields: &FieldSchemaMap, data: &FormData) -> FormData {
    data.iter()
        .map(|(key, value)| {
            let resolved = match (fields.get(key), value) {
                (Some(field), Value::String(label)) if field.is_choice() => field
                    .choice_value(label)
                    .map(|v| Value::String(v.to_string()))
                    .unwrap_or_else(|| value.clone()),
                _ => value.clone(),
            };
            (key.clone(), resolved)
        })
        .collect()
}

/// Classify how an integration was installed
///
/// Legacy bot installs are recognized by a `user_access_token` in their
/// metadata; an explicit `installation_type` always takes precedence.
pub fn get_integration_type(integration: &Integration) -> InstallationType {
    let metadata = &integration.metadata;

    let default_installation = if metadata.user_access_token.is_some() {
        InstallationType::ClassicBot
    } else {
        InstallationType::WorkspaceApp
    };

    metadata
        .installation_type
        .clone()
        .map(InstallationType::from)
        .unwrap_or(default_installation)
}

/// Pick the metadata of `issue_type`, falling back to the first issue type
///
/// An empty or absent `issue_type`, or one that matches no entry, selects
/// the first entry. An empty catalog is an error.
pub fn get_issue_type_meta<'a>(
    issue_type: Option<&str>,
    meta: &'a ProjectCreateMeta,
) -> Result<&'a IssueTypeMeta> {
    let matching = issue_type
        .filter(|t| !t.is_empty())
        .and_then(|t| meta.issuetypes.iter().find(|it| it.id == t));

    matching
        .or_else(|| meta.issuetypes.first())
        .ok_or_else(|| JiraError::NoIssueTypes(meta.key.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(value: serde_json::Value) -> JiraUser {
        serde_json::from_value(value).unwrap()
    }

    fn catalog(ids: &[&str]) -> ProjectCreateMeta {
        serde_json::from_value(json!({
            "id": "10000",
            "key": "APP",
            "issuetypes": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    fn form_fields(value: serde_json::Value) -> FieldSchemaMap {
        serde_json::from_value(value).unwrap()
    }

    fn form_data(value: serde_json::Value) -> FormData {
        value.as_object().cloned().unwrap()
    }

    // ========== build_user_choice ==========

    #[test]
    fn test_user_choice_missing_id_field() {
        let u = user(json!({"displayName": "Jane Doe", "name": "jdoe"}));
        assert_eq!(build_user_choice(&u, &UserIdField::AccountId), None);
        assert_eq!(build_user_choice(&u, &UserIdField::Key), None);
        assert_eq!(build_user_choice(&u, &UserIdField::Other("id".to_string())), None);
    }

    #[test]
    fn test_user_choice_full_label() {
        let u = user(json!({
            "id": "42",
            "displayName": "Jane Doe",
            "emailAddress": "jane@x.com",
            "name": "jdoe"
        }));
        let id_field: UserIdField = "id".parse().unwrap();

        assert_eq!(
            build_user_choice(&u, &id_field),
            Some(Choice::new("42", "Jane Doe - jane@x.com (jdoe)"))
        );
    }

    #[test]
    fn test_user_choice_name_only() {
        let u = user(json!({"id": "7", "name": "bob"}));
        let id_field: UserIdField = "id".parse().unwrap();

        assert_eq!(
            build_user_choice(&u, &id_field),
            Some(Choice::new("7", "bob (bob)"))
        );
    }

    #[test]
    fn test_user_choice_server_key() {
        let u = user(json!({"key": "JIRAUSER10100", "displayName": "Bob", "name": "bob"}));
        assert_eq!(
            build_user_choice(&u, &UserIdField::Key),
            Some(Choice::new("JIRAUSER10100", "Bob (bob)"))
        );
    }

    #[test]
    fn test_user_choice_numeric_id() {
        let u = user(json!({"id": 42, "displayName": "Jane Doe"}));
        assert_eq!(
            build_user_choice(&u, &UserIdField::Other("id".to_string())),
            Some(Choice::new("42", "Jane Doe"))
        );
    }

    #[test]
    fn test_user_choice_cloud_user_without_name() {
        let u = user(json!({
            "accountId": "5b10ac8d82e05b22cc7d4ef5",
            "displayName": "Mia Krystof",
            "emailAddress": "mia@example.com",
            "name": ""
        }));

        assert_eq!(
            build_user_choice(&u, &UserIdField::AccountId),
            Some(Choice::new("5b10ac8d82e05b22cc7d4ef5", "Mia Krystof - mia@example.com"))
        );
    }

    #[test]
    fn test_user_choice_empty_email_is_skipped() {
        let u = user(json!({"name": "bob", "displayName": "Bob", "emailAddress": ""}));
        assert_eq!(
            build_user_choice(&u, &UserIdField::Name),
            Some(Choice::new("bob", "Bob (bob)"))
        );
    }

    #[test]
    fn test_user_choice_nothing_but_id() {
        let u = user(json!({"accountId": "abc"}));
        assert_eq!(
            build_user_choice(&u, &UserIdField::AccountId),
            Some(Choice::new("abc", ""))
        );
    }

    // ========== transform_jira_fields_to_form_fields ==========

    #[test]
    fn test_fields_drop_nameless_and_updates_form() {
        let fields: Vec<IssueFormField> = serde_json::from_value(json!([
            {"name": "", "type": "select"},
            {"name": "priority", "type": "select", "updatesForm": true}
        ]))
        .unwrap();

        let result = transform_jira_fields_to_form_fields(&fields);

        assert_eq!(result.len(), 1);
        let priority = serde_json::to_value(&result["priority"]).unwrap();
        assert_eq!(priority["type"], json!("choice"));
        assert!(priority.get("updatesForm").is_none());
    }

    #[test]
    fn test_fields_rename_types_and_keep_attributes() {
        let fields: Vec<IssueFormField> = serde_json::from_value(json!([
            {"name": "title", "label": "Title", "type": "text", "required": true, "default": "Oops"},
            {"name": "description", "label": "Description", "type": "textarea", "autosize": true},
            {
                "name": "priority",
                "label": "Priority",
                "type": "select",
                "choices": [["1", "High"], ["2", "Low"]],
                "default": "2"
            }
        ]))
        .unwrap();

        let result = transform_jira_fields_to_form_fields(&fields);

        assert_eq!(result["title"].field_type, FieldType::String);
        assert_eq!(result["title"].label.as_deref(), Some("Title"));
        assert_eq!(result["title"].required, Some(true));
        assert_eq!(result["title"].default, Some(json!("Oops")));

        assert_eq!(
            result["description"].field_type,
            FieldType::Other("textarea".to_string())
        );
        assert_eq!(result["description"].extra.get("autosize"), Some(&json!(true)));

        assert_eq!(result["priority"].field_type, FieldType::Choice);
        assert_eq!(
            result["priority"].choices,
            Some(vec![Choice::new("1", "High"), Choice::new("2", "Low")])
        );
    }

    #[test]
    fn test_fields_later_duplicate_wins() {
        let fields: Vec<IssueFormField> = serde_json::from_value(json!([
            {"name": "labels", "type": "text", "label": "First"},
            {"name": "labels", "type": "select", "label": "Second"}
        ]))
        .unwrap();

        let result = transform_jira_fields_to_form_fields(&fields);

        assert_eq!(result.len(), 1);
        assert_eq!(result["labels"].label.as_deref(), Some("Second"));
        assert_eq!(result["labels"].field_type, FieldType::Choice);
    }

    #[test]
    fn test_fields_empty_input() {
        assert!(transform_jira_fields_to_form_fields(&[]).is_empty());
    }

    // ========== transform_jira_choices_to_strings ==========

    #[test]
    fn test_choices_resolve_labels() {
        let fields = form_fields(json!({
            "priority": {"name": "priority", "type": "choice", "choices": [["1", "High"], ["2", "Low"]]}
        }));
        let data = form_data(json!({"priority": "High", "summary": "text"}));

        let result = transform_jira_choices_to_strings(&fields, &data);

        assert_eq!(result, form_data(json!({"priority": "1", "summary": "text"})));
    }

    #[test]
    fn test_choices_unmatched_label_passes_through() {
        let fields = form_fields(json!({
            "priority": {"name": "priority", "type": "choice", "choices": [["1", "High"], ["2", "Low"]]}
        }));
        let data = form_data(json!({"priority": "Medium"}));

        let result = transform_jira_choices_to_strings(&fields, &data);

        assert_eq!(result["priority"], json!("Medium"));
    }

    #[test]
    fn test_choices_with_numeric_values() {
        let fields = form_fields(json!({
            "priority": {"name": "priority", "type": "choice", "choices": [[1, "High"], [2, "Low"]]}
        }));
        let data = form_data(json!({"priority": "Low"}));

        let result = transform_jira_choices_to_strings(&fields, &data);

        assert_eq!(result["priority"], json!("2"));
    }

    #[test]
    fn test_choices_non_choice_fields_untouched() {
        let fields = form_fields(json!({
            "summary": {"name": "summary", "type": "string", "choices": [["x", "text"]]},
            "priority": {"name": "priority", "type": "choice"}
        }));
        let data = form_data(json!({"summary": "text", "priority": "High", "count": 3}));

        let result = transform_jira_choices_to_strings(&fields, &data);

        assert_eq!(result, data);
    }

    #[test]
    fn test_choices_keep_key_set() {
        let fields = FieldSchemaMap::new();
        let data = form_data(json!({"a": 1, "b": null, "c": ["x"]}));

        let result = transform_jira_choices_to_strings(&fields, &data);

        assert_eq!(
            result.keys().collect::<Vec<_>>(),
            data.keys().collect::<Vec<_>>()
        );
    }

    // ========== get_integration_type ==========

    fn integration(metadata: serde_json::Value) -> Integration {
        serde_json::from_value(json!({"id": 1, "metadata": metadata})).unwrap()
    }

    #[test]
    fn test_integration_type_classic_bot() {
        let i = integration(json!({"user_access_token": "x"}));
        assert_eq!(get_integration_type(&i), InstallationType::ClassicBot);
    }

    #[test]
    fn test_integration_type_workspace_app() {
        let i = integration(json!({}));
        assert_eq!(get_integration_type(&i), InstallationType::WorkspaceApp);
    }

    #[test]
    fn test_integration_type_explicit_override() {
        let plain = integration(json!({"installation_type": "custom"}));
        assert_eq!(get_integration_type(&plain).as_str(), "custom");

        let legacy = integration(json!({"installation_type": "custom", "user_access_token": "x"}));
        assert_eq!(
            get_integration_type(&legacy),
            InstallationType::Other("custom".to_string())
        );

        let pinned = integration(json!({"installation_type": "workspace_app", "user_access_token": "x"}));
        assert_eq!(get_integration_type(&pinned), InstallationType::WorkspaceApp);
    }

    // ========== get_issue_type_meta ==========

    #[test]
    fn test_issue_type_meta_match() {
        let meta = catalog(&["1", "2"]);
        assert_eq!(get_issue_type_meta(Some("2"), &meta).unwrap().id, "2");
    }

    #[test]
    fn test_issue_type_meta_fallbacks() {
        let meta = catalog(&["1", "2"]);
        assert_eq!(get_issue_type_meta(None, &meta).unwrap().id, "1");
        assert_eq!(get_issue_type_meta(Some(""), &meta).unwrap().id, "1");
        assert_eq!(get_issue_type_meta(Some("9"), &meta).unwrap().id, "1");
    }

    #[test]
    fn test_issue_type_meta_first_duplicate_wins() {
        let meta: ProjectCreateMeta = serde_json::from_value(json!({
            "id": "10000",
            "key": "APP",
            "issuetypes": [
                {"id": "1", "name": "Bug"},
                {"id": "2", "name": "Story"},
                {"id": "2", "name": "Epic"}
            ]
        }))
        .unwrap();

        assert_eq!(get_issue_type_meta(Some("2"), &meta).unwrap().name, "Story");
    }

    #[test]
    fn test_issue_type_meta_empty_catalog() {
        let meta = catalog(&[]);
        let err = get_issue_type_meta(Some("1"), &meta).unwrap_err();
        assert!(matches!(err, JiraError::NoIssueTypes(ref key) if key == "APP"));
    }
}
