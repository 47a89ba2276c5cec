//! Principal record as returned by the external user directory.

use serde::{Deserialize, Serialize};

/// An authenticated entity (a user) as seen by the auth core.
///
/// The auth core never owns principal storage; it only receives these
/// records from a [`crate::traits::PrincipalDirectory`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque principal identifier.
    pub id: String,
    /// Email address, embedded in credentials as a claim.
    pub email: String,
    /// One-way hash of the principal's password.
    #[serde(skip_serializing)]
    pub credential_hash: String,
}

impl Principal {
    /// Builds a principal record.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
        }
    }
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish()
    }
}
