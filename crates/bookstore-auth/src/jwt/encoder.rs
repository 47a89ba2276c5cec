//! JWT credential pair creation with separate access/refresh secrets.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use crate::error::AuthError;
use crate::session_id;

use super::claims::{Claims, CredentialPair, TokenKind};

/// Signs access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for access tokens.
    access_key: EncodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates an encoder. Secrets and TTLs are validated by the caller.
    pub(crate) fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_key: EncodingKey::from_secret(access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Generates a new access + refresh pair for the given principal.
    pub fn issue_pair(&self, principal_id: &str, email: &str) -> Result<CredentialPair, AuthError> {
        let now = Utc::now();
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_session_id = session_id::new_access_session_id();
        let refresh_session_id = session_id::refresh_session_id(&access_session_id, principal_id);

        let access_claims = Claims {
            sid: access_session_id.clone(),
            sub: principal_id.to_string(),
            email: email.to_string(),
            exp: access_expires_at.timestamp(),
        };
        let refresh_claims = Claims {
            sid: refresh_session_id.clone(),
            sub: principal_id.to_string(),
            email: email.to_string(),
            exp: refresh_expires_at.timestamp(),
        };

        let access_token = self.sign(TokenKind::Access, &access_claims)?;
        let refresh_token = self.sign(TokenKind::Refresh, &refresh_claims)?;

        Ok(CredentialPair {
            access_token,
            refresh_token,
            access_session_id,
            refresh_session_id,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Signs arbitrary claims with the secret for `kind` (HS256).
    pub fn sign(&self, kind: TokenKind, claims: &Claims) -> Result<String, AuthError> {
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AuthError::Signing(format!("{kind:?} token: {e}")))
    }
}
