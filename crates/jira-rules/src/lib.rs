pub mod action;
pub mod client;
pub mod config_fields;
pub mod error;
pub mod models;
pub mod registry;
mod trait_impl;
pub mod traits;
pub mod utils;


pub use action::{CreateTicketAction, TicketEvent, TicketOutcome, TicketRule};
pub use client::{JiraClient, JiraFlavor};
pub use error::{JiraError, Result};
pub use models::*;
pub use registry::ExternalIssueRegistry;
pub use traits::JiraApi;
pub use utils::{
    build_user_choice, get_integration_type, get_issue_type_meta,
    transform_jira_choices_to_strings, transform_jira_fields_to_form_fields,
};
