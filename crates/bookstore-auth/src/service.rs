//! Login, registration, logout, and refresh flows.

use std::sync::Arc;

use tracing::{error, info, warn};

use bookstore_core::traits::{PasswordVerifier, PrincipalDirectory};
use bookstore_core::types::Principal;

use crate::error::AuthError;
use crate::guard::{AuthenticatedPrincipal, RequestGuard};
use crate::jwt::{CredentialPair, TokenService};
use crate::rbac::PolicyEnforcer;
use crate::session::SessionStore;
use crate::session_id;

/// Drives the credential lifecycle for principals owned by the embedding
/// application.
#[derive(Clone)]
pub struct AuthService {
    /// Credential issuance and verification.
    tokens: Arc<TokenService>,
    /// Live session records.
    sessions: SessionStore,
    /// Policy enforcer, for default grants.
    enforcer: Arc<PolicyEnforcer>,
    /// Principal lookup.
    directory: Arc<dyn PrincipalDirectory>,
    /// Password comparison.
    passwords: Arc<dyn PasswordVerifier>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .field("sessions", &self.sessions)
            .field("enforcer", &self.enforcer)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates the service from its components and ports.
    pub fn new(
        tokens: Arc<TokenService>,
        sessions: SessionStore,
        enforcer: Arc<PolicyEnforcer>,
        directory: Arc<dyn PrincipalDirectory>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            tokens,
            sessions,
            enforcer,
            directory,
            passwords,
        }
    }

    /// A request guard sharing this service's components.
    pub fn guard(&self) -> RequestGuard {
        RequestGuard::new(
            Arc::clone(&self.tokens),
            self.sessions.clone(),
            Arc::clone(&self.enforcer),
        )
    }

    /// Token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Policy enforcer.
    pub fn enforcer(&self) -> &PolicyEnforcer {
        &self.enforcer
    }

    /// Performs the login flow:
    ///
    /// 1. Look up the principal by email
    /// 2. Compare the password against the stored hash
    /// 3. Issue a credential pair and record both sessions
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<CredentialPair, AuthError> {
        let Some(principal) = self.directory.get_by_email(email).await? else {
            warn!(email = %email, "Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &principal.credential_hash)? {
            warn!(principal_id = %principal.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.start_session(&principal).await?;
        info!(
            principal_id = %principal.id,
            session_id = %pair.access_session_id,
            "Login successful"
        );
        Ok(pair)
    }

    /// Completes registration of a principal the caller has already stored:
    /// applies the default grants, then starts a session.
    pub async fn register(&self, principal: &Principal) -> Result<CredentialPair, AuthError> {
        self.enforcer.grant_defaults(&principal.id).await?;

        let pair = self.start_session(principal).await?;
        info!(
            principal_id = %principal.id,
            session_id = %pair.access_session_id,
            "Registration completed"
        );
        Ok(pair)
    }

    /// Revokes the access session and its paired refresh session.
    pub async fn logout(&self, principal: &AuthenticatedPrincipal) -> Result<(), AuthError> {
        self.sessions
            .revoke_access_session(&principal.session_id, &principal.principal_id)
            .await?;
        info!(
            principal_id = %principal.principal_id,
            session_id = %principal.session_id,
            "Logout completed"
        );
        Ok(())
    }

    /// Exchanges a refresh credential for a new pair:
    ///
    /// 1. Verify the refresh token against the refresh secret
    /// 2. Confirm its session is live and owned by the token's subject
    /// 3. Look up the principal (email may have changed)
    /// 4. Revoke the old refresh session, then the paired access session
    /// 5. Issue and record a new pair
    ///
    /// Each refresh credential works once; a second use fails at step 2.
    /// If the old access session cannot be removed no new pair is issued and
    /// the caller gets `RevocationIncomplete`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, AuthError> {
        let claims = self.tokens.verify_refresh_credential(refresh_token)?;

        let owner = self.sessions.lookup_session(claims.session_id()).await?;
        if owner != claims.sub {
            warn!(session_id = %claims.sid, "Refresh session owned by a different principal");
            return Err(AuthError::Unauthenticated);
        }
        let access_session_id = session_id::access_session_id_of(&claims.sid, &claims.sub)
            .ok_or_else(|| {
                AuthError::Malformed("refresh session id has no access session".to_string())
            })?;

        let Some(principal) = self.directory.get_by_id(&claims.sub).await? else {
            warn!(principal_id = %claims.sub, "Refresh for unknown principal");
            return Err(AuthError::Unauthenticated);
        };

        self.sessions.revoke_refresh_session(&claims.sid).await?;
        if let Err(e) = self.sessions.remove_session(access_session_id).await {
            error!(
                session_id = %access_session_id,
                error = %e,
                "Failed to remove access session during refresh"
            );
            return Err(AuthError::RevocationIncomplete(format!(
                "refresh: revoked, access: failed ({e})"
            )));
        }

        let pair = self.start_session(&principal).await?;
        info!(
            principal_id = %principal.id,
            session_id = %pair.access_session_id,
            "Credentials refreshed"
        );
        Ok(pair)
    }

    async fn start_session(&self, principal: &Principal) -> Result<CredentialPair, AuthError> {
        let pair = self
            .tokens
            .issue_credential_pair(&principal.id, &principal.email)?;
        self.sessions.create_session(&principal.id, &pair).await?;
        Ok(pair)
    }
}
