//! Credential signing configuration.

use serde::{Deserialize, Serialize};

/// Token signing secrets and lifetimes.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens. Empty unless configured.
    #[serde(default)]
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    #[serde(default)]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"****")
            .field("refresh_secret", &"****")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    24 * 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_secrets() {
        let config = AuthConfig::default();
        assert!(config.access_secret.is_empty());
        assert!(config.refresh_secret.is_empty());
        assert_eq!(config.access_ttl_minutes, 30);
        assert_eq!(config.refresh_ttl_hours, 168);
    }
}
