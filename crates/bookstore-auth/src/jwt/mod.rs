//! Stateless credential issuance and verification.
//!
//! Access and refresh tokens are signed with different secrets, so a leaked
//! access secret cannot mint refresh tokens (and vice versa).

pub mod claims;
pub mod decoder;
pub mod encoder;

use chrono::Duration;
use tracing::debug;

use bookstore_core::config::AuthConfig;

use crate::error::AuthError;

pub use claims::{Claims, CredentialPair, TokenKind};
pub use decoder::{JwtDecoder, bearer_token};
pub use encoder::JwtEncoder;

/// Issues and verifies signed session credentials.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Creates a token service from explicit secrets and lifetimes.
    ///
    /// Rejects empty, placeholder, or identical secrets, non-positive TTLs,
    /// and a refresh TTL that is not longer than the access TTL.
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(AuthError::Configuration(
                "signing secrets must not be empty".to_string(),
            ));
        }
        if is_placeholder(access_secret) || is_placeholder(refresh_secret) {
            return Err(AuthError::Configuration(
                "signing secrets still hold a placeholder value".to_string(),
            ));
        }
        if access_secret == refresh_secret {
            return Err(AuthError::Configuration(
                "access and refresh secrets must differ".to_string(),
            ));
        }
        if access_ttl <= Duration::zero() || refresh_ttl <= access_ttl {
            return Err(AuthError::Configuration(format!(
                "invalid token lifetimes (access {access_ttl}, refresh {refresh_ttl})"
            )));
        }

        Ok(Self {
            encoder: JwtEncoder::new(access_secret, refresh_secret, access_ttl, refresh_ttl),
            decoder: JwtDecoder::new(access_secret, refresh_secret),
        })
    }

    /// Creates a token service from the `auth` configuration section.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let access_ttl = i64::try_from(config.access_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes);
        let refresh_ttl = i64::try_from(config.refresh_ttl_hours)
            .ok()
            .and_then(Duration::try_hours);
        let (Some(access_ttl), Some(refresh_ttl)) = (access_ttl, refresh_ttl) else {
            return Err(AuthError::Configuration(
                "token lifetimes out of range".to_string(),
            ));
        };
        Self::new(
            &config.access_secret,
            &config.refresh_secret,
            access_ttl,
            refresh_ttl,
        )
    }

    /// Issues a new credential pair for a principal.
    pub fn issue_credential_pair(
        &self,
        principal_id: &str,
        email: &str,
    ) -> Result<CredentialPair, AuthError> {
        let pair = self.encoder.issue_pair(principal_id, email)?;
        debug!(
            principal_id = %principal_id,
            session_id = %pair.access_session_id,
            "Issued credential pair"
        );
        Ok(pair)
    }

    /// Verifies an access token (signature, algorithm family, expiry, claims).
    pub fn verify_credential(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.verify(TokenKind::Access, token)
    }

    /// Verifies a refresh token against the refresh secret.
    pub fn verify_refresh_credential(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.verify(TokenKind::Refresh, token)
    }

    /// Parses `<scheme> <token>` and verifies the token as an access token.
    pub fn extract_from_authorization_header(&self, header_value: &str) -> Result<Claims, AuthError> {
        let token = bearer_token(header_value)?;
        self.verify_credential(token)
    }

    /// Signs caller-built claims. Used for re-issuing and by tests that need
    /// precise expiry control.
    pub fn sign_claims(&self, kind: TokenKind, claims: &Claims) -> Result<String, AuthError> {
        self.encoder.sign(kind, claims)
    }
}

/// Template values such as `CHANGE_ME_ACCESS_SECRET` are public.
fn is_placeholder(secret: &str) -> bool {
    secret
        .get(..PLACEHOLDER_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PLACEHOLDER_PREFIX))
}

const PLACEHOLDER_PREFIX: &str = "CHANGE_ME";
