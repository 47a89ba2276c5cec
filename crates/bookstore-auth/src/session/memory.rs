//! In-memory session backend for tests and single-process runs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use bookstore_core::result::AppResult;

use super::backend::SessionBackend;

/// Process-local session map.
///
/// Records never expire on their own: the TTL passed to [`put`] is ignored
/// and nothing sweeps stale entries. A revoked session is gone immediately,
/// but an unrevoked one outlives its credential, so this backend is not a
/// substitute for Redis in production. Expired tokens are still rejected by
/// signature verification before the store is consulted.
///
/// [`put`]: SessionBackend::put
#[derive(Debug, Clone, Default)]
pub struct MemorySessionBackend {
    /// Session id → principal id.
    records: Arc<DashMap<String, String>>,
}

impl MemorySessionBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the backend holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn put(&self, session_id: &str, principal_id: &str, _ttl: Duration) -> AppResult<()> {
        self.records
            .insert(session_id.to_string(), principal_id.to_string());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<String>> {
        Ok(self.records.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, session_id: &str) -> AppResult<u64> {
        Ok(u64::from(self.records.remove(session_id).is_some()))
    }

    async fn put_pair(
        &self,
        principal_id: &str,
        first: (&str, Duration),
        second: (&str, Duration),
    ) -> AppResult<()> {
        self.records
            .insert(first.0.to_string(), principal_id.to_string());
        self.records
            .insert(second.0.to_string(), principal_id.to_string());
        Ok(())
    }
}
