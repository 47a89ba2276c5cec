//! Repository implementations.

pub mod policy;

pub use policy::PgPolicyAdapter;
