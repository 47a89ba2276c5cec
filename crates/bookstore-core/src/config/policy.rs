//! Policy enforcer configuration.

use serde::{Deserialize, Serialize};

/// Where policy rules are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAdapterKind {
    /// Process-local rule list. Tests and local runs only.
    #[default]
    Memory,
    /// PostgreSQL `policy_rules` table.
    Postgres,
}

/// Policy enforcer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Persistence adapter selection.
    #[serde(default)]
    pub adapter: PolicyAdapterKind,
    /// Path to a TOML rule-model file. The built-in model is used when unset.
    #[serde(default)]
    pub model_path: Option<String>,
}
