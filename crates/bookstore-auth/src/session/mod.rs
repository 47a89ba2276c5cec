//! Live session records and revocation.
//!
//! Tokens are stateless, so a logged-out token keeps a valid signature until
//! it expires. The store holds the set of session identifiers that are still
//! live; removing a record is what makes logout take effect immediately.
//!
//! Backends:
//! - Redis with native per-key expiry (multi-node, production)
//! - In-memory map without expiry (tests and single-process local runs)

pub mod backend;
pub mod memory;
#[cfg(feature = "redis-session")]
pub mod redis;
pub mod store;

pub use backend::SessionBackend;
pub use memory::MemorySessionBackend;
#[cfg(feature = "redis-session")]
pub use self::redis::RedisSessionBackend;
pub use store::SessionStore;
