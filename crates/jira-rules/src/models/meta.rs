use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Response of `GET /issue/createmeta` with `projects.issuetypes.fields` expanded
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateMeta {
    #[serde(default)]
    pub projects: Vec<ProjectCreateMeta>,
}

/// Create metadata for a single project
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectCreateMeta {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Issue types that can be created in this project, in Jira's order
    pub issuetypes: Vec<IssueTypeMeta>,
}

/// Schema descriptor for one category of ticket (Bug, Story, ...)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IssueTypeMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subtask: bool,
    /// Fields available on the create screen, keyed by field id
    #[serde(default)]
    pub fields: BTreeMap<String, FieldMeta>,
}

/// One field on an issue type's create screen
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub schema: FieldSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<AllowedValue>>,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_complete_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Value type (`string`, `array`, `option`, `user`, `priority`, ...)
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Element type for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    /// Set for system fields (`summary`, `labels`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Set for custom fields, e.g. `com.atlassian.jira.plugin.system.customfieldtypes:select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

/// Allowed value of a constrained field
///
/// System values (priorities, components, versions) carry `name`; custom
/// field options carry `value`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AllowedValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AllowedValue {
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.value.as_deref())
            .or(self.id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_create_meta() {
        let meta: CreateMeta = serde_json::from_value(json!({
            "expand": "projects",
            "projects": [{
                "id": "10000",
                "key": "APP",
                "name": "App",
                "issuetypes": [{
                    "id": "1",
                    "name": "Bug",
                    "subtask": false,
                    "fields": {
                        "priority": {
                            "required": false,
                            "name": "Priority",
                            "key": "priority",
                            "schema": {"type": "priority", "system": "priority"},
                            "allowedValues": [
                                {"id": "1", "name": "Highest", "iconUrl": "https://example.com/1.svg"}
                            ],
                            "hasDefaultValue": true,
                            "operations": ["set"]
                        }
                    }
                }]
            }]
        }))
        .unwrap();

        let project = &meta.projects[0];
        assert_eq!(project.key, "APP");
        let priority = &project.issuetypes[0].fields["priority"];
        assert_eq!(priority.schema.schema_type, "priority");
        let values = priority.allowed_values.as_ref().unwrap();
        assert_eq!(values[0].label(), Some("Highest"));
        assert!(values[0].extra.contains_key("iconUrl"));
    }

    #[test]
    fn test_missing_issuetypes_is_rejected() {
        let result: Result<ProjectCreateMeta, _> =
            serde_json::from_value(json!({"id": "10000", "key": "APP"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_allowed_value_label_fallback() {
        let option: AllowedValue =
            serde_json::from_value(json!({"id": "10100", "value": "Red"})).unwrap();
        assert_eq!(option.label(), Some("Red"));

        let bare: AllowedValue = serde_json::from_value(json!({"id": "3"})).unwrap();
        assert_eq!(bare.label(), Some("3"));
    }
}
