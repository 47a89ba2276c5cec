//! Error taxonomy for the auth core.
//!
//! Component errors stay precise (`Malformed`, `Expired`, ...). The
//! [`crate::guard::RequestGuard`] collapses them into `Unauthenticated` or
//! `Forbidden` before anything reaches a client.

use thiserror::Error;

use bookstore_core::error::{AppError, ErrorKind};

/// Errors produced by credential, session, and policy operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The header, token, or claims are structurally invalid.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// The signature does not verify or the algorithm is not HMAC-SHA2.
    #[error("invalid credential signature")]
    InvalidSignature,

    /// The credential is past its `exp` claim.
    #[error("credential has expired")]
    Expired,

    /// No live session record exists for the session identifier.
    #[error("session not found")]
    SessionNotFound,

    /// A logout removed fewer records than it should have.
    #[error("session revocation incomplete: {0}")]
    RevocationIncomplete(String),

    /// A session record could not be written.
    #[error("session store write failed: {0}")]
    StoreWriteFailed(String),

    /// The rule set could not be loaded at construction.
    #[error("policy load failed: {0}")]
    PolicyLoadFailed(String),

    /// The rule set could not be persisted after a mutation.
    #[error("policy persistence failed: {0}")]
    PolicyPersistFailed(String),

    /// Credential or session check failed (caller-visible).
    #[error("unauthenticated")]
    Unauthenticated,

    /// Permission check failed (caller-visible).
    #[error("forbidden")]
    Forbidden,

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token encoding failed.
    #[error("failed to sign credential: {0}")]
    Signing(String),

    /// Invalid secrets, TTLs, or rule model.
    #[error("invalid auth configuration: {0}")]
    Configuration(String),

    /// Input rejected by the rule model.
    #[error("{0}")]
    Validation(String),

    /// A collaborator (store, directory) failed outside the cases above.
    #[error(transparent)]
    Backend(#[from] AppError),
}

impl AuthError {
    /// Whether this error is one of the credential/session failures that the
    /// request guard reports as `Unauthenticated`.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_)
                | Self::InvalidSignature
                | Self::Expired
                | Self::SessionNotFound
                | Self::Unauthenticated
                | Self::InvalidCredentials
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if let AuthError::Backend(inner) = err {
            return inner;
        }
        let kind = match &err {
            AuthError::Malformed(_)
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::SessionNotFound
            | AuthError::Unauthenticated
            | AuthError::InvalidCredentials => ErrorKind::Authentication,
            AuthError::Forbidden => ErrorKind::Authorization,
            AuthError::RevocationIncomplete(_) | AuthError::StoreWriteFailed(_) => {
                ErrorKind::Session
            }
            AuthError::PolicyLoadFailed(_) | AuthError::PolicyPersistFailed(_) => {
                ErrorKind::Database
            }
            AuthError::Signing(_) | AuthError::Backend(_) => ErrorKind::Internal,
            AuthError::Configuration(_) => ErrorKind::Configuration,
            AuthError::Validation(_) => ErrorKind::Validation,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error_kind() {
        assert_eq!(AppError::from(AuthError::Expired).kind, ErrorKind::Authentication);
        assert_eq!(AppError::from(AuthError::Forbidden).kind, ErrorKind::Authorization);
        assert_eq!(
            AppError::from(AuthError::RevocationIncomplete("x".into())).kind,
            ErrorKind::Session
        );
        assert_eq!(
            AppError::from(AuthError::PolicyPersistFailed("x".into())).kind,
            ErrorKind::Database
        );
    }

    #[test]
    fn test_backend_error_passes_through() {
        let err = AuthError::Backend(AppError::cache("redis down"));
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Cache);
        assert_eq!(app.message, "redis down");
    }

    #[test]
    fn test_authentication_failures() {
        assert!(AuthError::Expired.is_authentication_failure());
        assert!(AuthError::Malformed(String::new()).is_authentication_failure());
        assert!(!AuthError::Forbidden.is_authentication_failure());
        assert!(!AuthError::StoreWriteFailed(String::new()).is_authentication_failure());
    }
}
