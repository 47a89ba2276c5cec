//! Policy rule management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bookstore_core::config::AppConfig;
use bookstore_core::error::AppError;
use bookstore_core::types::{Action, PolicyRule};

use crate::output::{self, OutputFormat};

/// Arguments for policy commands
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Policy subcommand
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy subcommands
#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Grant an action on a resource class
    Grant(RuleArgs),
    /// Revoke an action on a resource class
    Revoke(RuleArgs),
    /// Check whether a principal may perform an action
    Check(RuleArgs),
    /// Grant the model's default rules to a principal
    Defaults {
        /// Principal id
        principal: String,
    },
    /// List rules
    List {
        /// Only rules for this principal
        #[arg(short, long)]
        principal: Option<String>,
    },
    /// List the resource classes the model declares
    Resources,
}

/// A single (principal, resource, action) triple
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Principal id
    pub principal: String,
    /// Resource class
    pub resource: String,
    /// Action (`read` or `write`)
    pub action: Action,
}

/// Rule display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RuleRow {
    /// Principal id
    subject: String,
    /// Resource class
    resource: String,
    /// Action
    action: String,
}

impl From<PolicyRule> for RuleRow {
    fn from(rule: PolicyRule) -> Self {
        Self {
            subject: rule.subject,
            resource: rule.resource,
            action: rule.action.to_string(),
        }
    }
}

/// Check result for JSON output
#[derive(Debug, Serialize)]
struct CheckResult<'a> {
    principal: &'a str,
    resource: &'a str,
    action: Action,
    allowed: bool,
}

/// Execute policy commands
pub async fn execute(
    args: &PolicyArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let enforcer = super::create_enforcer(config).await?;

    match &args.command {
        PolicyCommand::Grant(rule) => {
            let changed = enforcer
                .grant_policy(&rule.principal, &rule.resource, rule.action)
                .await?;
            if changed {
                output::print_success(&format!(
                    "Granted {} on '{}' to '{}'.",
                    rule.action, rule.resource, rule.principal
                ));
            } else {
                output::print_warning("Rule already present; nothing changed.");
            }
        }
        PolicyCommand::Revoke(rule) => {
            let changed = enforcer
                .revoke_policy(&rule.principal, &rule.resource, rule.action)
                .await?;
            if changed {
                output::print_success(&format!(
                    "Revoked {} on '{}' from '{}'.",
                    rule.action, rule.resource, rule.principal
                ));
            } else {
                output::print_warning("Rule not present; nothing changed.");
            }
        }
        PolicyCommand::Check(rule) => {
            let allowed = enforcer.is_allowed(&rule.principal, &rule.resource, rule.action);
            match format {
                OutputFormat::Json => output::print_json(&CheckResult {
                    principal: &rule.principal,
                    resource: &rule.resource,
                    action: rule.action,
                    allowed,
                }),
                OutputFormat::Table => {
                    let verdict = if allowed { "allowed" } else { "denied" };
                    println!(
                        "{} {} on '{}': {verdict}",
                        rule.principal, rule.action, rule.resource
                    );
                }
            }
        }
        PolicyCommand::Defaults { principal } => {
            if enforcer.grant_defaults(principal).await? {
                output::print_success(&format!("Default rules granted to '{principal}'."));
            } else {
                output::print_warning("Default rules already present; nothing changed.");
            }
        }
        PolicyCommand::List { principal } => {
            let rules = match principal {
                Some(principal) => enforcer.rules_for(principal),
                None => enforcer.rules(),
            };
            let rows: Vec<RuleRow> = rules.into_iter().map(RuleRow::from).collect();
            output::print_list(&rows, format);
        }
        PolicyCommand::Resources => {
            let resources: Vec<&str> = enforcer.model().resources().collect();
            match format {
                OutputFormat::Json => output::print_json(&resources),
                OutputFormat::Table => {
                    for resource in resources {
                        println!("{resource}");
                    }
                }
            }
        }
    }

    Ok(())
}
