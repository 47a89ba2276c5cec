//! Session store backend configuration.

use serde::{Deserialize, Serialize};

/// Which backend holds live session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackendKind {
    /// Process-local map without expiry. Tests and local runs only.
    #[default]
    Memory,
    /// Redis with native per-key expiry.
    Redis,
}

/// Session store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStoreConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: SessionBackendKind,
    /// Redis connection settings, used when `backend = "redis"`.
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all session keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "bookstore:".to_string()
}
