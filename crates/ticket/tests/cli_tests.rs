use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ticket.toml");
    std::fs::write(&path, body).unwrap();
    path
}

/// Command wired to the mock Jira with an isolated config
fn ticket(config: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("ticket");
    cmd.arg("--config")
        .arg(config)
        .env("JIRA_MOCK_DIR", fixtures_dir().join("jira"))
        .env("NO_COLOR", "1")
        .env_remove("JIRA_URL")
        .env_remove("JIRA_EMAIL")
        .env_remove("JIRA_TOKEN")
        .env_remove("JIRA_FLAVOR");
    cmd
}

const CLOUD_CONFIG: &str = r#"
[integration]
id = 1
name = "Jira Cloud"

[integration.metadata]
base_url = "https://example.atlassian.net"
domain_name = "example.atlassian.net"
"#;

#[test]
fn test_help_command() {
    cargo_bin_cmd!("ticket")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Create Jira tickets from alert rules"));
}

#[test]
fn test_missing_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    cargo_bin_cmd!("ticket")
        .arg("--config")
        .arg(&config)
        .args(["issue", "APP-1"])
        .env_remove("JIRA_MOCK_DIR")
        .env_remove("JIRA_URL")
        .env_remove("JIRA_EMAIL")
        .env_remove("JIRA_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL not configured"));
}

#[test]
fn test_missing_config_file() {
    cargo_bin_cmd!("ticket")
        .args(["--config", "/nonexistent/ticket.toml", "issue", "APP-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_fields_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CLOUD_CONFIG);

    let output = ticket(&config)
        .args(["-o", "json", "fields", "APP"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["priority"]["type"], "choice");
    assert_eq!(json["priority"]["choices"][1], serde_json::json!(["2", "High"]));
    assert_eq!(json["summary"]["type"], "string");
    assert!(json["issuetype"].get("updatesForm").is_none());
}

#[test]
fn test_fields_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CLOUD_CONFIG);

    ticket(&config)
        .args(["fields", "APP", "--issue-type", "Story"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team [choice]"))
        .stdout(predicate::str::contains("Backend, Frontend"));
}

#[test]
fn test_users_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CLOUD_CONFIG);

    ticket(&config)
        .args(["users", "APP", "-q", "jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe - jane@example.com"))
        .stdout(predicate::str::contains("Bob Smith").not());
}

#[test]
fn test_create_twice_links_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CLOUD_CONFIG);
    let registry = dir.path().join("links.json");
    let rule = fixtures_dir().join("rule.json");

    let output = ticket(&config)
        .args(["-o", "json", "create"])
        .arg(&rule)
        .args(["--group", "42", "--title", "TypeError: cart is undefined"])
        .arg("--registry")
        .arg(&registry)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["outcome"], "created");
    assert_eq!(json["key"], "APP-123");
    assert_eq!(json["group_id"], 42);
    assert!(registry.exists());

    ticket(&config)
        .arg("create")
        .arg(&rule)
        .args(["--group", "42", "--title", "TypeError: cart is undefined"])
        .arg("--registry")
        .arg(&registry)
        .assert()
        .success()
        .stdout(predicate::str::contains("already linked to APP-123"));
}

#[test]
fn test_create_wrong_integration() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[integration]\nid = 5\n");

    ticket(&config)
        .arg("create")
        .arg(fixtures_dir().join("rule.json"))
        .args(["--group", "1", "--title", "Boom"])
        .arg("--registry")
        .arg(dir.path().join("links.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("integration 1"));
}

#[test]
fn test_issue_not_found_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CLOUD_CONFIG);

    ticket(&config)
        .args(["-o", "json", "issue", "APP-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""error": true"#))
        .stderr(predicate::str::contains("Issue not found: APP-999"));
}

#[test]
fn test_integration_type() {
    let dir = tempfile::tempdir().unwrap();

    let modern = write_config(dir.path(), CLOUD_CONFIG);
    ticket(&modern)
        .arg("integration-type")
        .assert()
        .success()
        .stdout(predicate::str::diff("workspace_app\n"));

    let legacy = write_config(
        dir.path(),
        "[integration]\nid = 1\n\n[integration.metadata]\nuser_access_token = \"xoxp-legacy\"\n",
    );
    ticket(&legacy)
        .args(["-o", "json", "integration-type"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""installation_type": "classic_bot""#));
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "token = \"super-secret\"\n");

    ticket(&config)
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn test_mock_runs_share_the_link_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("links.json");
    let config = write_config(
        dir.path(),
        &format!("registry = {:?}\n{}", registry.display().to_string(), CLOUD_CONFIG),
    );
    let rule = fixtures_dir().join("rule.json");

    for (group, key) in [("1", "APP-123"), ("2", "APP-124")] {
        ticket(&config)
            .arg("create")
            .arg(&rule)
            .args(["--group", group, "--title", format!("Crash in group {}", group).as_str()])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("Created {} for group {}", key, group)));
    }

    ticket(&config)
        .args(["issue", "APP-123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("APP-123 - Crash in group 1"));
}
