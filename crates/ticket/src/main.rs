mod cli;
mod color;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use config::Config;
use jira_mock::MockJira;
use jira_rules::{get_integration_type, ExternalIssueRegistry, JiraApi, JiraClient, TicketEvent};
use output::output_error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    color::init(cli.color);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(
        cli.url.clone(),
        cli.email.clone(),
        cli.token.clone(),
        cli.flavor.map(Into::into),
    );

    // Commands that don't need a Jira connection
    match &cli.command {
        Commands::Config { action } => return handle_config(&config, action, cli),
        Commands::IntegrationType => return handle_integration_type(&config, cli.format),
        _ => {}
    }

    if let Some(dir) = jira_mock::get_mock_dir() {
        debug!(dir = %dir.display(), "using mock jira");
        // Tickets from earlier runs only survive in the link registry
        let links_path = registry_path(&config, cli);
        let registry = ExternalIssueRegistry::load(&links_path)
            .with_context(|| format!("Failed to load registry {}", links_path.display()))?;
        let client = MockJira::from_dir(&dir)
            .with_context(|| format!("Failed to load mock fixtures from {}", dir.display()))?
            .with_user_id_field(config.flavor.user_id_field())
            .with_linked_issues(registry.iter());
        return run_with_client(&client, &config, cli);
    }

    let creds = config.credentials()?;
    let client = JiraClient::new(creds.url, creds.email, creds.token).with_flavor(config.flavor);
    run_with_client(&client, &config, cli)
}

fn run_with_client(client: &dyn JiraApi, config: &Config, cli: &Cli) -> Result<()> {
    let integration = config.integration();

    match &cli.command {
        Commands::Fields {
            project,
            issue_type,
        } => commands::fields::handle_fields(
            client,
            &integration,
            project,
            issue_type.as_deref(),
            cli.format,
        ),
        Commands::Users { project, query } => commands::fields::handle_users(
            client,
            &integration,
            project,
            query.as_deref(),
            cli.format,
        ),
        Commands::Create {
            rule,
            group,
            title,
            culprit,
            message,
            link,
            ..
        } => {
            let event = TicketEvent {
                group_id: *group,
                title: title.clone(),
                culprit: culprit.clone(),
                message: message.clone(),
                url: link.clone(),
            };
            let registry_path = registry_path(config, cli);
            commands::create::handle_create(
                client,
                &integration,
                rule,
                &event,
                &registry_path,
                cli.format,
            )
        }
        Commands::Issue { key } => commands::issue::handle_get(client, key, cli.format),
        // Handled in run() before a client is built
        Commands::Config { .. } | Commands::IntegrationType => Ok(()),
    }
}

/// `--registry` on `create`, otherwise the configured location
fn registry_path(config: &Config, cli: &Cli) -> PathBuf {
    match &cli.command {
        Commands::Create {
            registry: Some(path),
            ..
        } => path.clone(),
        _ => config.registry_path(),
    }
}

fn handle_integration_type(config: &Config, format: OutputFormat) -> Result<()> {
    let integration = config.integration();
    let installation_type = get_integration_type(&integration);

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "integration_id": integration.id,
                "installation_type": installation_type,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", installation_type);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, action: &ConfigCommands, cli: &Cli) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let shown = config.redacted();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                OutputFormat::Text => {
                    let text = serde_json::to_string_pretty(&shown)?;
                    println!("{}", text);
                    println!("Registry: {}", config.registry_path().display());
                }
            }
        }
        ConfigCommands::Path => {
            for path in config::config_paths(cli.config.as_deref()) {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
