//! Policy-driven authorization.
//!
//! Rules are `(principal, resource class, action)` triples loaded from a
//! [`PolicyAdapter`](bookstore_core::traits::PolicyAdapter) and evaluated in
//! memory against an immutable snapshot.

pub mod enforcer;
pub mod index;
pub mod memory;
pub mod model;

pub use enforcer::PolicyEnforcer;
pub use index::RuleIndex;
pub use memory::MemoryPolicyAdapter;
pub use model::{DefaultGrant, PolicyModel};

/// Resource classes and registration grants used when `policy.model_path`
/// is unset.
pub const BUILTIN_MODEL: &str = include_str!("model.toml");
