//! Policy persistence port behind the enforcer.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::PolicyRule;

/// Durable storage for policy rules.
///
/// The enforcer loads the full rule set through [`load_all`](Self::load_all)
/// and writes the full set back through [`save_all`](Self::save_all) after
/// every mutation. `save_all` must be all-or-nothing: a failed call leaves
/// the previously persisted set intact.
#[async_trait]
pub trait PolicyAdapter: Send + Sync + 'static {
    /// Load every persisted rule.
    async fn load_all(&self) -> AppResult<Vec<PolicyRule>>;

    /// Persist a single rule. Returns `false` if it was already present.
    async fn add_rule(&self, rule: &PolicyRule) -> AppResult<bool>;

    /// Remove a single rule. Returns `false` if it was not present.
    async fn remove_rule(&self, rule: &PolicyRule) -> AppResult<bool>;

    /// Replace the persisted rule set with `rules`.
    async fn save_all(&self, rules: &[PolicyRule]) -> AppResult<()>;
}
