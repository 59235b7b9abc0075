use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::ExternalIssue;

/// Tickets already created for alerting groups
///
/// One ticket per `(integration, group)`; the rule action consults this
/// before calling Jira so repeated alerts do not open duplicates.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExternalIssueRegistry {
    #[serde(default)]
    issues: Vec<ExternalIssue>,
    #[serde(skip)]
    index: BTreeMap<(u64, u64), usize>,
}

impl ExternalIssueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry saved with [`ExternalIssueRegistry::save`]; a missing file is empty
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let mut registry: Self = serde_json::from_str(&content)?;
        registry.reindex();
        Ok(registry)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .issues
            .iter()
            .enumerate()
            .map(|(i, issue)| ((issue.integration_id, issue.group_id), i))
            .collect();
    }

    pub fn get(&self, integration_id: u64, group_id: u64) -> Option<&ExternalIssue> {
        self.index
            .get(&(integration_id, group_id))
            .map(|&i| &self.issues[i])
    }

    /// Record the ticket created for a group, replacing any previous link
    pub fn link(&mut self, integration_id: u64, group_id: u64, key: &str, title: &str) -> &ExternalIssue {
        let issue = ExternalIssue {
            integration_id,
            group_id,
            key: key.to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
        };

        let slot = match self.index.get(&(integration_id, group_id)) {
            Some(&i) => {
                self.issues[i] = issue;
                i
            }
            None => {
                self.issues.push(issue);
                self.issues.len() - 1
            }
        };
        self.index.insert((integration_id, group_id), slot);
        &self.issues[slot]
    }

    /// Links carrying a given Jira key
    pub fn by_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ExternalIssue> + 'a {
        self.issues.iter().filter(move |i| i.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalIssue> {
        self.issues.iter()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
