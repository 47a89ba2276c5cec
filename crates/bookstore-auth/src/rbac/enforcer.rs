//! Policy enforcer with snapshot swapping.
//!
//! Readers take a `parking_lot` read lock just long enough to clone the
//! current `Arc<RuleIndex>`, then evaluate on that clone with no lock held.
//! The write side of that lock is only taken for the pointer swap. Writers
//! serialize on an async mutex, build the next snapshot, persist it, and
//! only then swap it in. Dropping a mutation future before
//! the write completes leaves the live snapshot untouched.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use bookstore_core::config::PolicyConfig;
use bookstore_core::traits::PolicyAdapter;
use bookstore_core::types::{Action, PolicyRule};

use crate::error::AuthError;

use super::index::RuleIndex;
use super::model::PolicyModel;

/// Decides whether a principal may perform an action on a resource class.
pub struct PolicyEnforcer {
    /// Known resource classes and default grants.
    model: PolicyModel,
    /// Durable rule storage.
    adapter: Arc<dyn PolicyAdapter>,
    /// Live snapshot.
    snapshot: RwLock<Arc<RuleIndex>>,
    /// Serializes mutations.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer")
            .field("model", &self.model)
            .field("rules", &self.snapshot.read().len())
            .finish_non_exhaustive()
    }
}

impl PolicyEnforcer {
    /// Loads the full rule set and builds the enforcer.
    ///
    /// Fails with `PolicyLoadFailed` if the adapter cannot load.
    pub async fn new(model: PolicyModel, adapter: Arc<dyn PolicyAdapter>) -> Result<Self, AuthError> {
        let rules = adapter.load_all().await.map_err(|e| {
            error!(error = %e, "Failed to load policy rules");
            AuthError::PolicyLoadFailed(e.to_string())
        })?;

        let index = RuleIndex::from_rules(rules);
        for rule in index.rules() {
            if !model.knows_resource(&rule.resource) {
                warn!(rule = %rule, "Persisted rule references an unknown resource class");
            }
        }
        info!(rules = index.len(), "Policy enforcer loaded");

        Ok(Self {
            model,
            adapter,
            snapshot: RwLock::new(Arc::new(index)),
            write_lock: Mutex::new(()),
        })
    }

    /// Loads the configured model and builds the enforcer on `adapter`.
    pub async fn from_config(
        config: &PolicyConfig,
        adapter: Arc<dyn PolicyAdapter>,
    ) -> Result<Self, AuthError> {
        let model = PolicyModel::load_or_builtin(config.model_path.as_deref())?;
        Self::new(model, adapter).await
    }

    /// In-memory permission check. No matching rule is `false`.
    pub fn is_allowed(&self, principal_id: &str, resource: &str, action: Action) -> bool {
        if !self.model.knows_resource(resource) {
            debug!(resource = %resource, "Permission check on unknown resource class");
            return false;
        }
        self.current().allows(principal_id, resource, action)
    }

    /// Adds a rule and persists the full set.
    ///
    /// Returns `false` when the rule was already present (nothing persisted).
    pub async fn grant_policy(
        &self,
        principal_id: &str,
        resource: &str,
        action: Action,
    ) -> Result<bool, AuthError> {
        let rule = self.validated_rule(principal_id, resource, action)?;
        let changed = self.mutate(std::slice::from_ref(&rule), &[]).await?;
        if changed {
            info!(rule = %rule, "Policy granted");
        }
        Ok(changed)
    }

    /// Removes a rule and persists the full set.
    ///
    /// Returns `false` when the rule was absent (nothing persisted).
    pub async fn revoke_policy(
        &self,
        principal_id: &str,
        resource: &str,
        action: Action,
    ) -> Result<bool, AuthError> {
        let rule = PolicyRule::new(principal_id, resource, action);
        let changed = self.mutate(&[], std::slice::from_ref(&rule)).await?;
        if changed {
            info!(rule = %rule, "Policy revoked");
        }
        Ok(changed)
    }

    /// Applies the model's default grants to a principal in one write.
    pub async fn grant_defaults(&self, principal_id: &str) -> Result<bool, AuthError> {
        if principal_id.is_empty() {
            return Err(AuthError::Validation("principal id must not be empty".to_string()));
        }
        let rules = self.model.default_rules_for(principal_id);
        let changed = self.mutate(&rules, &[]).await?;
        if changed {
            info!(principal_id = %principal_id, grants = rules.len(), "Default policies granted");
        }
        Ok(changed)
    }

    /// Replaces the snapshot with the persisted rule set.
    pub async fn reload(&self) -> Result<usize, AuthError> {
        let _guard = self.write_lock.lock().await;
        let rules = self
            .adapter
            .load_all()
            .await
            .map_err(|e| AuthError::PolicyLoadFailed(e.to_string()))?;
        let index = Arc::new(RuleIndex::from_rules(rules));
        let count = index.len();
        *self.snapshot.write() = index;
        info!(rules = count, "Policy rules reloaded");
        Ok(count)
    }

    /// Current rules, sorted.
    pub fn rules(&self) -> Vec<PolicyRule> {
        self.current().rules().to_vec()
    }

    /// Current rules for one principal.
    pub fn rules_for(&self, principal_id: &str) -> Vec<PolicyRule> {
        self.current().rules_for(principal_id).cloned().collect()
    }

    /// The rule model.
    pub fn model(&self) -> &PolicyModel {
        &self.model
    }

    /// Clones the live snapshot; the read lock is released on return.
    fn current(&self) -> Arc<RuleIndex> {
        Arc::clone(&self.snapshot.read())
    }

    fn validated_rule(
        &self,
        principal_id: &str,
        resource: &str,
        action: Action,
    ) -> Result<PolicyRule, AuthError> {
        if principal_id.is_empty() {
            return Err(AuthError::Validation("principal id must not be empty".to_string()));
        }
        if !self.model.knows_resource(resource) {
            return Err(AuthError::Validation(format!(
                "unknown resource class '{resource}'"
            )));
        }
        Ok(PolicyRule::new(principal_id, resource, action))
    }

    /// Builds, persists, then swaps. Returns whether anything changed.
    async fn mutate(&self, added: &[PolicyRule], removed: &[PolicyRule]) -> Result<bool, AuthError> {
        let _guard = self.write_lock.lock().await;
        let current = self.current();

        let noop = added.iter().all(|r| current.contains(r))
            && removed.iter().all(|r| !current.contains(r));
        if noop {
            return Ok(false);
        }

        let next = current.apply(added, removed);
        self.adapter.save_all(next.rules()).await.map_err(|e| {
            error!(error = %e, "Failed to persist policy rules");
            AuthError::PolicyPersistFailed(e.to_string())
        })?;

        *self.snapshot.write() = Arc::new(next);
        Ok(true)
    }
}
