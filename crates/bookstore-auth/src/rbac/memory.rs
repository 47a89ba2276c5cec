//! In-memory policy adapter for tests and local runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use bookstore_core::error::AppError;
use bookstore_core::result::AppResult;
use bookstore_core::traits::PolicyAdapter;
use bookstore_core::types::PolicyRule;

/// Process-local rule list.
///
/// `set_fail_loads` / `set_fail_writes` make the next calls fail so callers
/// can exercise their error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicyAdapter {
    rules: Arc<Mutex<Vec<PolicyRule>>>,
    fail_loads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryPolicyAdapter {
    /// Creates an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter pre-populated with `rules`.
    pub fn with_rules(rules: impl IntoIterator<Item = PolicyRule>) -> Self {
        let adapter = Self::new();
        *adapter.rules.lock() = rules.into_iter().collect();
        adapter
    }

    /// Makes `load_all` fail while set.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Makes every write fail while set.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The currently persisted rules.
    pub fn persisted(&self) -> Vec<PolicyRule> {
        self.rules.lock().clone()
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("policy store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyAdapter for MemoryPolicyAdapter {
    async fn load_all(&self) -> AppResult<Vec<PolicyRule>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(AppError::database("policy store unavailable"));
        }
        Ok(self.persisted())
    }

    async fn add_rule(&self, rule: &PolicyRule) -> AppResult<bool> {
        self.check_writable()?;
        let mut rules = self.rules.lock();
        if rules.contains(rule) {
            return Ok(false);
        }
        rules.push(rule.clone());
        Ok(true)
    }

    async fn remove_rule(&self, rule: &PolicyRule) -> AppResult<bool> {
        self.check_writable()?;
        let mut rules = self.rules.lock();
        let before = rules.len();
        rules.retain(|r| r != rule);
        Ok(rules.len() != before)
    }

    async fn save_all(&self, rules: &[PolicyRule]) -> AppResult<()> {
        self.check_writable()?;
        *self.rules.lock() = rules.to_vec();
        Ok(())
    }
}
