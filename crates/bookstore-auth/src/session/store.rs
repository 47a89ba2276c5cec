//! Session lifecycle on top of a [`SessionBackend`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use bookstore_core::config::{SessionBackendKind, SessionStoreConfig};

use crate::error::AuthError;
use crate::jwt::CredentialPair;
use crate::session_id;

use super::backend::SessionBackend;
use super::memory::MemorySessionBackend;

/// Creates, looks up, and revokes session records.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Storage backend.
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    /// Creates a store on the given backend.
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Creates a store on a fresh [`MemorySessionBackend`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionBackend::new()))
    }

    /// Creates a store for the configured backend, connecting if needed.
    pub async fn from_config(config: &SessionStoreConfig) -> Result<Self, AuthError> {
        match config.backend {
            SessionBackendKind::Memory => {
                warn!("Using in-memory session store; records do not expire");
                Ok(Self::in_memory())
            }
            #[cfg(feature = "redis-session")]
            SessionBackendKind::Redis => {
                let client = bookstore_cache::RedisClient::connect(&config.redis).await?;
                Ok(Self::new(Arc::new(super::RedisSessionBackend::new(client))))
            }
            #[cfg(not(feature = "redis-session"))]
            SessionBackendKind::Redis => Err(AuthError::Configuration(
                "redis session backend requires the `redis-session` feature".to_string(),
            )),
        }
    }

    /// Records both halves of a freshly issued pair.
    ///
    /// The backend writes both records or neither (see
    /// [`SessionBackend::put_pair`]); on failure the pair must not be handed
    /// out. With the Redis backend the two writes are one `MULTI`/`EXEC`, so
    /// dropping this future cannot leave a lone access record. Backends
    /// relying on the default `put_pair` can, if dropped between writes.
    pub async fn create_session(
        &self,
        principal_id: &str,
        pair: &CredentialPair,
    ) -> Result<(), AuthError> {
        let now = Utc::now();
        let access_ttl = remaining_ttl(pair.access_expires_at, now)?;
        let refresh_ttl = remaining_ttl(pair.refresh_expires_at, now)?;

        if let Err(e) = self
            .backend
            .put_pair(
                principal_id,
                (&pair.access_session_id, access_ttl),
                (&pair.refresh_session_id, refresh_ttl),
            )
            .await
        {
            error!(principal_id = %principal_id, error = %e, "Failed to store session pair");
            return Err(AuthError::StoreWriteFailed(e.to_string()));
        }

        debug!(
            principal_id = %principal_id,
            session_id = %pair.access_session_id,
            "Session created"
        );
        Ok(())
    }

    /// Returns the owning principal id of a live session.
    pub async fn lookup_session(&self, session_id: &str) -> Result<String, AuthError> {
        match self.backend.get(session_id).await? {
            Some(principal_id) => Ok(principal_id),
            None => Err(AuthError::SessionNotFound),
        }
    }

    /// Revokes an access session and its derived refresh session.
    ///
    /// Both deletions are attempted even if the first one fails. Anything
    /// other than exactly one record removed for each is
    /// `RevocationIncomplete`.
    pub async fn revoke_access_session(
        &self,
        access_session_id: &str,
        principal_id: &str,
    ) -> Result<(), AuthError> {
        let refresh_session_id = session_id::refresh_session_id(access_session_id, principal_id);

        let access = self.backend.delete(access_session_id).await;
        let refresh = self.backend.delete(&refresh_session_id).await;

        match (access, refresh) {
            (Ok(1), Ok(1)) => {
                info!(
                    principal_id = %principal_id,
                    session_id = %access_session_id,
                    "Session revoked"
                );
                Ok(())
            }
            (access, refresh) => {
                let detail = format!(
                    "access: {}, refresh: {}",
                    describe_delete(&access),
                    describe_delete(&refresh)
                );
                warn!(
                    principal_id = %principal_id,
                    session_id = %access_session_id,
                    detail = %detail,
                    "Session revocation incomplete"
                );
                Err(AuthError::RevocationIncomplete(detail))
            }
        }
    }

    /// Revokes a single refresh session.
    pub async fn revoke_refresh_session(&self, refresh_session_id: &str) -> Result<(), AuthError> {
        match self.backend.delete(refresh_session_id).await? {
            0 => Err(AuthError::SessionNotFound),
            _ => {
                debug!(session_id = %refresh_session_id, "Refresh session revoked");
                Ok(())
            }
        }
    }

    /// Removes a record if present, reporting whether one was removed.
    pub async fn remove_session(&self, session_id: &str) -> Result<bool, AuthError> {
        Ok(self.backend.delete(session_id).await? > 0)
    }
}

/// Time left until `expires_at`, rounded up to whole seconds.
fn remaining_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<Duration, AuthError> {
    let millis = (expires_at - now).num_milliseconds();
    if millis <= 0 {
        return Err(AuthError::StoreWriteFailed(
            "credential expired before its session was stored".to_string(),
        ));
    }
    let seconds = u64::try_from(millis).unwrap_or(u64::MAX).div_ceil(1000);
    Ok(Duration::from_secs(seconds))
}

fn describe_delete(result: &bookstore_core::result::AppResult<u64>) -> String {
    match result {
        Ok(count) => format!("{count} removed"),
        Err(e) => format!("failed ({e})"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    use bookstore_core::error::AppError;
    use bookstore_core::result::AppResult;

    use super::*;

    /// Memory backend whose writes fail for session ids containing a marker.
    #[derive(Debug, Default)]
    struct FlakyBackend {
        inner: MemorySessionBackend,
        fail_puts_containing: Option<&'static str>,
        fail_deletes: AtomicBool,
    }

    #[async_trait]
    impl SessionBackend for FlakyBackend {
        async fn put(&self, session_id: &str, principal_id: &str, ttl: Duration) -> AppResult<()> {
            if self
                .fail_puts_containing
                .is_some_and(|marker| session_id.contains(marker))
            {
                return Err(AppError::cache("connection reset"));
            }
            self.inner.put(session_id, principal_id, ttl).await
        }

        async fn get(&self, session_id: &str) -> AppResult<Option<String>> {
            self.inner.get(session_id).await
        }

        async fn delete(&self, session_id: &str) -> AppResult<u64> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(AppError::cache("connection reset"));
            }
            self.inner.delete(session_id).await
        }
    }

    fn pair(access_sid: &str, principal_id: &str) -> CredentialPair {
        let now = Utc::now();
        CredentialPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
            access_session_id: access_sid.to_string(),
            refresh_session_id: session_id::refresh_session_id(access_sid, principal_id),
            access_expires_at: now + ChronoDuration::minutes(30),
            refresh_expires_at: now + ChronoDuration::days(7),
        }
    }

    #[tokio::test]
    async fn test_create_then_lookup() {
        let store = SessionStore::in_memory();
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();

        assert_eq!(store.lookup_session("s1").await.unwrap(), "u1");
        assert_eq!(store.lookup_session("s1++u1").await.unwrap(), "u1");
        assert!(matches!(
            store.lookup_session("unknown").await,
            Err(AuthError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_revoke_access_removes_both() {
        let store = SessionStore::in_memory();
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();

        store.revoke_access_session("s1", "u1").await.unwrap();
        assert!(matches!(
            store.lookup_session("s1").await,
            Err(AuthError::SessionNotFound)
        ));
        assert!(matches!(
            store.lookup_session("s1++u1").await,
            Err(AuthError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_revoke_twice_is_incomplete() {
        let store = SessionStore::in_memory();
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();
        store.revoke_access_session("s1", "u1").await.unwrap();

        assert!(matches!(
            store.revoke_access_session("s1", "u1").await,
            Err(AuthError::RevocationIncomplete(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_with_missing_refresh_is_incomplete() {
        let store = SessionStore::in_memory();
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();
        store.revoke_refresh_session("s1++u1").await.unwrap();

        assert!(matches!(
            store.revoke_access_session("s1", "u1").await,
            Err(AuthError::RevocationIncomplete(_))
        ));
        // The access half was still removed.
        assert!(store.lookup_session("s1").await.is_err());
    }

    #[tokio::test]
    async fn test_revoke_refresh_not_found() {
        let store = SessionStore::in_memory();
        assert!(matches!(
            store.revoke_refresh_session("nope++u1").await,
            Err(AuthError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_partial_write_is_rolled_back() {
        let backend = Arc::new(FlakyBackend {
            fail_puts_containing: Some("++"),
            ..Default::default()
        });
        let store = SessionStore::new(backend.clone());

        let result = store.create_session("u1", &pair("s1", "u1")).await;
        assert!(matches!(result, Err(AuthError::StoreWriteFailed(_))));
        assert!(backend.inner.is_empty());
    }

    #[tokio::test]
    async fn test_memory_pair_write_stores_both() {
        let backend = MemorySessionBackend::new();
        backend
            .put_pair(
                "u1",
                ("s1", Duration::from_secs(60)),
                ("s1++u1", Duration::from_secs(120)),
            )
            .await
            .unwrap();
        assert_eq!(backend.len(), 2);
        assert_eq!(backend.get("s1++u1").await.unwrap().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_access_write_failure() {
        let backend = Arc::new(FlakyBackend {
            fail_puts_containing: Some("s1"),
            ..Default::default()
        });
        let store = SessionStore::new(backend);
        assert!(matches!(
            store.create_session("u1", &pair("s1", "u1")).await,
            Err(AuthError::StoreWriteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_is_incomplete() {
        let backend = Arc::new(FlakyBackend::default());
        let store = SessionStore::new(backend.clone());
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();

        backend.fail_deletes.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.revoke_access_session("s1", "u1").await,
            Err(AuthError::RevocationIncomplete(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_sessions_are_independent() {
        let store = SessionStore::in_memory();
        store.create_session("u1", &pair("s1", "u1")).await.unwrap();
        store.create_session("u1", &pair("s2", "u1")).await.unwrap();

        store.revoke_access_session("s1", "u1").await.unwrap();
        assert_eq!(store.lookup_session("s2").await.unwrap(), "u1");
    }

    #[test]
    fn test_remaining_ttl_rounds_up() {
        let now = Utc::now();
        let ttl = remaining_ttl(now + ChronoDuration::milliseconds(1500), now).unwrap();
        assert_eq!(ttl, Duration::from_secs(2));

        assert!(remaining_ttl(now, now).is_err());
        assert!(remaining_ttl(now - ChronoDuration::seconds(1), now).is_err());
    }
}
