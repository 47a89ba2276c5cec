//! CLI command definitions and dispatch.

pub mod migrate;
pub mod policy;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use bookstore_auth::rbac::{MemoryPolicyAdapter, PolicyEnforcer};
use bookstore_core::config::{AppConfig, PolicyAdapterKind};
use bookstore_core::error::AppError;
use bookstore_core::traits::PolicyAdapter;
use bookstore_database::{DatabasePool, PgPolicyAdapter};

use crate::output::OutputFormat;

/// Bookstore credential and policy administration
#[derive(Debug, Parser)]
#[command(name = "bookstore-auth", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Policy rule management
    Policy(policy::PolicyArgs),
    /// Credential issuance and inspection
    Token(token::TokenArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Policy(args) => policy::execute(args, config, self.format).await,
            Commands::Token(args) => token::execute(args, config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, config).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build the configured policy adapter
pub async fn create_policy_adapter(config: &AppConfig) -> Result<Arc<dyn PolicyAdapter>, AppError> {
    match config.policy.adapter {
        PolicyAdapterKind::Postgres => {
            let pool = create_db_pool(config).await?;
            Ok(Arc::new(PgPolicyAdapter::new(pool.pool().clone())))
        }
        PolicyAdapterKind::Memory => {
            warn!("Using in-memory policy adapter; changes are lost when the command exits");
            Ok(Arc::new(MemoryPolicyAdapter::new()))
        }
    }
}

/// Helper: load the enforcer with the configured model and adapter
pub async fn create_enforcer(config: &AppConfig) -> Result<PolicyEnforcer, AppError> {
    let adapter = create_policy_adapter(config).await?;
    Ok(PolicyEnforcer::from_config(&config.policy, adapter).await?)
}
