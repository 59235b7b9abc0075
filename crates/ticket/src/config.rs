use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use jira_rules::{Integration, JiraFlavor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback registry location when no data directory is available
const LOCAL_REGISTRY_FILE: &str = ".ticket-links.json";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Jira instance URL; falls back to the integration's `base_url`
    pub url: Option<String>,
    /// Account email (Cloud) or username (Server)
    pub email: Option<String>,
    /// API token (Cloud) or password (Server)
    pub token: Option<String>,
    #[serde(default)]
    pub flavor: JiraFlavor,
    /// Where created-ticket links are kept between runs
    pub registry: Option<PathBuf>,
    /// The integration tickets are created through
    #[serde(default)]
    pub integration: Integration,
}

/// Connection settings once validated
pub struct Credentials<'a> {
    pub url: &'a str,
    pub email: &'a str,
    pub token: &'a str,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("JIRA_").only(&["url", "email", "token", "flavor"]));

        let mut config: Config = figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))?;

        if config.url.is_none() {
            config.url = config.integration.metadata.base_url.clone();
        }

        Ok(config)
    }

    pub fn merge_with_cli(
        &mut self,
        cli_url: Option<String>,
        cli_email: Option<String>,
        cli_token: Option<String>,
        cli_flavor: Option<JiraFlavor>,
    ) {
        if let Some(url) = cli_url {
            self.url = Some(url);
        }
        if let Some(email) = cli_email {
            self.email = Some(email);
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
        if let Some(flavor) = cli_flavor {
            self.flavor = flavor;
        }
    }

    /// Validated connection settings
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        let url = self.url.as_deref().ok_or_else(|| {
            anyhow!("Jira URL not configured. Set via --url, JIRA_URL env var, or config file")
        })?;
        let email = self.email.as_deref().ok_or_else(|| {
            anyhow!("Jira email not configured. Set via --email, JIRA_EMAIL env var, or config file")
        })?;
        let token = self.token.as_deref().ok_or_else(|| {
            anyhow!("Jira token not configured. Set via --token, JIRA_TOKEN env var, or config file")
        })?;

        Ok(Credentials { url, email, token })
    }

    /// The configured integration, completed with connection defaults
    pub fn integration(&self) -> Integration {
        let mut integration = self.integration.clone();
        if integration.provider.is_empty() {
            integration.provider = "jira".to_string();
        }
        if integration.metadata.base_url.is_none() {
            integration.metadata.base_url = self.url.clone();
        }
        integration
    }

    pub fn registry_path(&self) -> PathBuf {
        if let Some(path) = &self.registry {
            return path.clone();
        }

        ProjectDirs::from("", "", "ticket")
            .map(|d| d.data_dir().join("links.json"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_REGISTRY_FILE))
    }

    /// Copy safe to print, with the token redacted
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(token) = value.get_mut("token").filter(|t| !t.is_null()) {
            *token = serde_json::Value::String("********".to_string());
        }
        if let Some(secret) = value
            .pointer_mut("/integration/metadata/shared_secret")
            .filter(|s| !s.is_null())
        {
            *secret = serde_json::Value::String("********".to_string());
        }
        value
    }
}

pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ticket").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("ticket").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("ticket")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("ticket.toml"))
}
