//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod logging;
pub mod policy;
pub mod session;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::policy::{PolicyAdapterKind, PolicyConfig};
pub use self::session::{RedisConfig, SessionBackendKind, SessionStoreConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (base file + environment overlay + `BOOKSTORE_*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionStoreConfig,
    /// Policy enforcer settings.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges `path` with an optional `config/{env}` overlay, where `env`
    /// comes from `BOOKSTORE_ENV` (default `development`), and environment
    /// variables prefixed with `BOOKSTORE_`
    /// (e.g. `BOOKSTORE_AUTH__ACCESS_SECRET`). Every source is optional.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("BOOKSTORE_ENV").unwrap_or_else(|_| "development".to_string());
        debug!(path = %path, env = %env, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BOOKSTORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if loaded.auth.access_secret.is_empty() || loaded.auth.refresh_secret.is_empty() {
            warn!("Signing secrets are not configured; credential issuance will be refused");
        }
        Ok(loaded)
    }
}

fn default_database_url() -> String {
    "postgres://localhost:5432/bookstore".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.auth.access_ttl_minutes, 30);
        assert_eq!(config.auth.refresh_ttl_hours, 168);
        assert_eq!(config.session.backend, SessionBackendKind::Memory);
        assert_eq!(config.policy.adapter, PolicyAdapterKind::Memory);
        assert!(config.policy.model_path.is_none());
        assert!(config.auth.access_secret.is_empty());
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does-not-exist/bookstore").unwrap();
        assert_eq!(config.auth.access_ttl_minutes, 30);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [auth]
            access_secret = "a"
            refresh_secret = "r"
            access_ttl_minutes = 10

            [session]
            backend = "redis"

            [session.redis]
            url = "redis://cache:6379"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.auth.access_secret, "a");
        assert_eq!(config.auth.access_ttl_minutes, 10);
        assert_eq!(config.auth.refresh_ttl_hours, 168);
        assert_eq!(config.session.backend, SessionBackendKind::Redis);
        assert_eq!(config.session.redis.url, "redis://cache:6379");
        assert_eq!(config.session.redis.key_prefix, "bookstore:");
    }
}
