//! JWT claims and the issued credential pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims payload embedded in both access and refresh tokens.
///
/// Decoding is strict: a missing, mistyped, or unknown field rejects the
/// token instead of falling back to a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Session identifier, the revocation key.
    pub sid: String,
    /// Subject, the principal id.
    pub sub: String,
    /// Principal email.
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the session identifier.
    pub fn session_id(&self) -> &str {
        &self.sid
    }

    /// Returns the principal id.
    pub fn principal_id(&self) -> &str {
        &self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Which secret a token is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token used only to mint a new pair.
    Refresh,
}

/// Result of a successful issuance.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Random access session id.
    pub access_session_id: String,
    /// Refresh session id derived from the access session id.
    pub refresh_session_id: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_session_id", &self.access_session_id)
            .field("refresh_session_id", &self.refresh_session_id)
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_field() {
        let json = r#"{"sid":"s","sub":"u1","email":"e","exp":1,"role":"admin"}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_rejects_missing_field() {
        let json = r#"{"sid":"s","sub":"u1","exp":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_rejects_mistyped_field() {
        let json = r#"{"sid":42,"sub":"u1","email":"e","exp":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let pair = CredentialPair {
            access_token: "secret-access".into(),
            refresh_token: "secret-refresh".into(),
            access_session_id: "a".into(),
            refresh_session_id: "a++u1".into(),
            access_expires_at: Utc::now(),
            refresh_expires_at: Utc::now(),
        };
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
