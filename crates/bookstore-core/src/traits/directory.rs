//! Principal lookup port used by the login and refresh flows.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::Principal;

/// Read-only access to the user store owned by the embedding application.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync + 'static {
    /// Find a principal by email. Returns `None` if no such principal exists.
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Principal>>;

    /// Find a principal by id. Returns `None` if no such principal exists.
    async fn get_by_id(&self, id: &str) -> AppResult<Option<Principal>>;
}
