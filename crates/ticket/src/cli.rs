use clap::{Parser, Subcommand, ValueEnum};
use jira_rules::JiraFlavor;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ticket",
    version,
    about = "Create Jira tickets from alert rules"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "TICKET_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Jira instance URL (overrides config file)
    #[arg(long, env = "JIRA_URL", global = true)]
    pub url: Option<String>,

    /// Account email or username (overrides config file)
    #[arg(long, env = "JIRA_EMAIL", global = true)]
    pub email: Option<String>,

    /// API token or password (overrides config file)
    #[arg(long, env = "JIRA_TOKEN", global = true)]
    pub token: Option<String>,

    /// Jira deployment flavor
    #[arg(long, value_enum, global = true)]
    pub flavor: Option<Flavor>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Jira Cloud (users identified by account id)
    Cloud,
    /// Jira Server / Data Center (users identified by username)
    Server,
}

impl From<Flavor> for JiraFlavor {
    fn from(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Cloud => JiraFlavor::Cloud,
            Flavor::Server => JiraFlavor::Server,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the create-ticket form fields for a project
    #[command(visible_alias = "f")]
    Fields {
        /// Project key or id
        project: String,

        /// Issue type id or name (defaults to the project's first issue type)
        #[arg(long, short = 't')]
        issue_type: Option<String>,
    },
    /// List assignable users as form choices
    #[command(visible_alias = "u")]
    Users {
        /// Project key or id
        project: String,

        /// Filter users by name or email
        #[arg(long, short = 'q')]
        query: Option<String>,
    },
    /// Trigger a create-ticket rule for an alerting group
    #[command(visible_alias = "c")]
    Create {
        /// Path to the rule action JSON
        rule: PathBuf,

        /// Alerting group id
        #[arg(long)]
        group: u64,

        /// Event title, used when the rule sets no summary
        #[arg(long)]
        title: String,

        /// Event culprit
        #[arg(long)]
        culprit: Option<String>,

        /// Event message
        #[arg(long)]
        message: Option<String>,

        /// Link back to the group
        #[arg(long = "link", value_name = "URL")]
        link: Option<String>,

        /// Registry file of already created tickets (overrides config)
        #[arg(long, value_name = "PATH")]
        registry: Option<PathBuf>,
    },
    /// Get a Jira issue
    #[command(visible_alias = "i")]
    Issue {
        /// Issue key (e.g., APP-123)
        key: String,
    },
    /// Show how the configured integration was installed
    IntegrationType,
    /// Configuration inspection
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (token redacted)
    Show,
    /// Print the config file search paths
    Path,
}
