//! Credential issuance and inspection commands.

use clap::{Args, Subcommand};

use bookstore_auth::TokenService;
use bookstore_auth::jwt::Claims;
use bookstore_auth::session::SessionStore;
use bookstore_core::config::AppConfig;
use bookstore_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a credential pair
    Issue {
        /// Principal id
        principal: String,
        /// Principal email
        email: String,
        /// Also record the sessions in the configured session store
        #[arg(long)]
        store: bool,
    },
    /// Verify a credential and print its claims
    Verify {
        /// Token string
        token: String,
        /// Verify against the refresh secret instead of the access secret
        #[arg(long)]
        refresh: bool,
    },
    /// Revoke an access session and its refresh partner
    Revoke {
        /// Access session id
        session_id: String,
        /// Owning principal id
        principal: String,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let tokens = TokenService::from_config(&config.auth)?;

    match &args.command {
        TokenCommand::Issue {
            principal,
            email,
            store,
        } => {
            let pair = tokens.issue_credential_pair(principal, email)?;
            if *store {
                let sessions = SessionStore::from_config(&config.session).await?;
                sessions.create_session(principal, &pair).await?;
            }

            match format {
                OutputFormat::Json => output::print_json(&pair),
                OutputFormat::Table => {
                    output::print_kv("Access session", &pair.access_session_id);
                    output::print_kv("Access expires", &pair.access_expires_at.to_rfc3339());
                    output::print_kv("Access token", &pair.access_token);
                    output::print_kv("Refresh session", &pair.refresh_session_id);
                    output::print_kv("Refresh expires", &pair.refresh_expires_at.to_rfc3339());
                    output::print_kv("Refresh token", &pair.refresh_token);
                }
            }
            if *store {
                output::print_success("Sessions recorded.");
            }
        }
        TokenCommand::Verify { token, refresh } => {
            let claims = if *refresh {
                tokens.verify_refresh_credential(token)?
            } else {
                tokens.verify_credential(token)?
            };
            print_claims(&claims, format);
        }
        TokenCommand::Revoke {
            session_id,
            principal,
        } => {
            let sessions = SessionStore::from_config(&config.session).await?;
            sessions.revoke_access_session(session_id, principal).await?;
            output::print_success(&format!("Session '{session_id}' revoked."));
        }
    }

    Ok(())
}

fn print_claims(claims: &Claims, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(claims),
        OutputFormat::Table => {
            output::print_kv("Session", claims.session_id());
            output::print_kv("Principal", claims.principal_id());
            output::print_kv("Email", &claims.email);
            let expires = claims
                .expires_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.exp.to_string());
            output::print_kv("Expires", &expires);
        }
    }
}
