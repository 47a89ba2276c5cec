//! Session backend trait.

use std::time::Duration;

use async_trait::async_trait;
use tracing::error;

use bookstore_core::result::AppResult;

/// Single-key storage for session records.
///
/// `put`, `get` and `delete` touch exactly one key and must be atomic for
/// that key.
/// Implementations never retry; the store decides what a failure means.
#[async_trait]
pub trait SessionBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Stores `session_id → principal_id`, expiring after `ttl` where the
    /// backend supports expiry.
    async fn put(&self, session_id: &str, principal_id: &str, ttl: Duration) -> AppResult<()>;

    /// Returns the owning principal id, or `None` if absent or expired.
    async fn get(&self, session_id: &str) -> AppResult<Option<String>>;

    /// Deletes the record and returns how many records were removed (0 or 1).
    async fn delete(&self, session_id: &str) -> AppResult<u64>;

    /// Stores two records for the same principal, or neither.
    ///
    /// The default writes `first` then `second` and deletes `first` again if
    /// the second write fails. A future dropped between the two writes can
    /// still leave `first` behind, so backends with a transactional write
    /// should override this.
    async fn put_pair(
        &self,
        principal_id: &str,
        first: (&str, Duration),
        second: (&str, Duration),
    ) -> AppResult<()> {
        self.put(first.0, principal_id, first.1).await?;
        if let Err(e) = self.put(second.0, principal_id, second.1).await {
            if let Err(cleanup) = self.delete(first.0).await {
                error!(
                    session_id = %first.0,
                    error = %cleanup,
                    "Failed to roll back session after partial write"
                );
            }
            return Err(e);
        }
        Ok(())
    }
}
