//! Shared fixtures for auth integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use parking_lot::Mutex;

use bookstore_auth::rbac::{MemoryPolicyAdapter, PolicyEnforcer, PolicyModel};
use bookstore_auth::session::{MemorySessionBackend, SessionBackend, SessionStore};
use bookstore_auth::{AuthService, RequestGuard, TokenService};
use bookstore_core::error::AppError;
use bookstore_core::result::AppResult;
use bookstore_core::traits::{PasswordVerifier, PrincipalDirectory};
use bookstore_core::types::Principal;

pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";

/// Principals keyed by id.
#[derive(Debug, Default)]
pub struct StubDirectory {
    principals: Mutex<HashMap<String, Principal>>,
}

impl StubDirectory {
    pub fn insert(&self, principal: Principal) {
        self.principals.lock().insert(principal.id.clone(), principal);
    }
}

#[async_trait]
impl PrincipalDirectory for StubDirectory {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .principals
            .lock()
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Principal>> {
        Ok(self.principals.lock().get(id).cloned())
    }
}

/// Treats `"hashed:<password>"` as the hash of `<password>`.
#[derive(Debug, Default)]
pub struct PrefixVerifier;

impl PrefixVerifier {
    pub fn hash(password: &str) -> String {
        format!("hashed:{password}")
    }
}

impl PasswordVerifier for PrefixVerifier {
    fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        match hash.strip_prefix("hashed:") {
            Some(stored) => Ok(stored == password),
            None => Err(AppError::validation("unrecognised hash format")),
        }
    }
}

/// Memory session backend that can be told to fail deletes of one id.
#[derive(Debug, Default)]
pub struct FaultySessionBackend {
    inner: MemorySessionBackend,
    failing_delete: Mutex<Option<String>>,
}

impl FaultySessionBackend {
    pub fn fail_deletes_of(&self, session_id: &str) {
        *self.failing_delete.lock() = Some(session_id.to_string());
    }
}

#[async_trait]
impl SessionBackend for FaultySessionBackend {
    async fn put(&self, session_id: &str, principal_id: &str, ttl: StdDuration) -> AppResult<()> {
        self.inner.put(session_id, principal_id, ttl).await
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<String>> {
        self.inner.get(session_id).await
    }

    async fn delete(&self, session_id: &str) -> AppResult<u64> {
        if self.failing_delete.lock().as_deref() == Some(session_id) {
            return Err(AppError::cache("connection reset"));
        }
        self.inner.delete(session_id).await
    }
}

/// Fully wired auth core on in-memory backends.
pub struct TestApp {
    pub service: AuthService,
    pub guard: RequestGuard,
    pub tokens: Arc<TokenService>,
    pub sessions: SessionStore,
    pub session_backend: MemorySessionBackend,
    pub session_faults: Arc<FaultySessionBackend>,
    pub enforcer: Arc<PolicyEnforcer>,
    pub policy_adapter: MemoryPolicyAdapter,
    pub directory: Arc<StubDirectory>,
}

impl TestApp {
    pub async fn new() -> Self {
        let tokens = Arc::new(
            TokenService::new(
                ACCESS_SECRET,
                REFRESH_SECRET,
                Duration::minutes(30),
                Duration::days(7),
            )
            .unwrap(),
        );
        let session_backend = MemorySessionBackend::new();
        let session_faults = Arc::new(FaultySessionBackend {
            inner: session_backend.clone(),
            failing_delete: Mutex::new(None),
        });
        let sessions = SessionStore::new(session_faults.clone());
        let policy_adapter = MemoryPolicyAdapter::new();
        let enforcer = Arc::new(
            PolicyEnforcer::new(
                PolicyModel::builtin().unwrap(),
                Arc::new(policy_adapter.clone()),
            )
            .await
            .unwrap(),
        );
        let directory = Arc::new(StubDirectory::default());

        let service = AuthService::new(
            Arc::clone(&tokens),
            sessions.clone(),
            Arc::clone(&enforcer),
            directory.clone(),
            Arc::new(PrefixVerifier),
        );
        let guard = service.guard();

        Self {
            service,
            guard,
            tokens,
            sessions,
            session_backend,
            session_faults,
            enforcer,
            policy_adapter,
            directory,
        }
    }

    /// Stores a principal with password `password`.
    pub fn create_principal(&self, id: &str, email: &str, password: &str) -> Principal {
        let principal = Principal::new(id, email, PrefixVerifier::hash(password));
        self.directory.insert(principal.clone());
        principal
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
