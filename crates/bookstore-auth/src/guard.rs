//! Request authorization: credential → session liveness → permission.
//!
//! The checks run in that order and stop at the first failure. Component
//! errors are logged here and collapsed into `Unauthenticated` (steps 1-2)
//! or `Forbidden` (step 3), so callers learn nothing about which check failed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use bookstore_core::types::Action;

use crate::error::AuthError;
use crate::jwt::{Claims, TokenService};
use crate::rbac::PolicyEnforcer;
use crate::session::SessionStore;

/// Principal attached to a request after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    /// Principal id (`sub`).
    pub principal_id: String,
    /// Principal email.
    pub email: String,
    /// Access session id, needed to log out.
    pub session_id: String,
    /// Access credential expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Claims> for AuthenticatedPrincipal {
    fn from(claims: Claims) -> Self {
        let expires_at = claims.expires_at();
        Self {
            principal_id: claims.sub,
            email: claims.email,
            session_id: claims.sid,
            expires_at,
        }
    }
}

/// Composes the token service, session store, and enforcer per request.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    tokens: Arc<TokenService>,
    sessions: SessionStore,
    enforcer: Arc<PolicyEnforcer>,
}

impl RequestGuard {
    /// Creates a guard over shared components.
    pub fn new(
        tokens: Arc<TokenService>,
        sessions: SessionStore,
        enforcer: Arc<PolicyEnforcer>,
    ) -> Self {
        Self {
            tokens,
            sessions,
            enforcer,
        }
    }

    /// Verifies the `Authorization` header value and confirms the session
    /// is live.
    pub async fn authenticate(
        &self,
        authorization: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = self
            .tokens
            .extract_from_authorization_header(authorization)
            .map_err(|e| {
                warn!(error = %e, "Rejected credential");
                AuthError::Unauthenticated
            })?;

        let owner = self
            .sessions
            .lookup_session(claims.session_id())
            .await
            .map_err(|e| {
                match &e {
                    AuthError::SessionNotFound => warn!(
                        principal_id = %claims.sub,
                        session_id = %claims.sid,
                        "Credential for revoked or expired session"
                    ),
                    other => error!(
                        session_id = %claims.sid,
                        error = %other,
                        "Session lookup failed"
                    ),
                }
                AuthError::Unauthenticated
            })?;

        if owner != claims.sub {
            warn!(
                principal_id = %claims.sub,
                session_id = %claims.sid,
                "Session owned by a different principal"
            );
            return Err(AuthError::Unauthenticated);
        }

        Ok(claims.into())
    }

    /// Authenticates, then requires `action` on `resource`.
    pub async fn authorize(
        &self,
        authorization: &str,
        resource: &str,
        action: Action,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let principal = self.authenticate(authorization).await?;
        self.require(&principal, resource, action)?;
        Ok(principal)
    }

    /// Permission check for an already authenticated principal.
    pub fn require(
        &self,
        principal: &AuthenticatedPrincipal,
        resource: &str,
        action: Action,
    ) -> Result<(), AuthError> {
        if self
            .enforcer
            .is_allowed(&principal.principal_id, resource, action)
        {
            debug!(
                principal_id = %principal.principal_id,
                resource = %resource,
                action = %action,
                "Permission granted"
            );
            Ok(())
        } else {
            warn!(
                principal_id = %principal.principal_id,
                resource = %resource,
                action = %action,
                "Permission denied"
            );
            Err(AuthError::Forbidden)
        }
    }
}
