//! # bookstore-auth
//!
//! Authentication and authorization core for the bookstore service.
//!
//! ## Modules
//!
//! - `jwt`: credential pair issuance and verification (access + refresh)
//! - `session`: live session records and revocation
//! - `rbac`: policy rule model and the snapshot-swapping enforcer
//! - `guard`: ordered request checks (credential → session → permission)
//! - `service`: login, registration, logout, and refresh flows

pub mod error;
pub mod guard;
pub mod jwt;
pub mod rbac;
pub mod service;
pub mod session;
pub mod session_id;

pub use error::AuthError;
pub use guard::{AuthenticatedPrincipal, RequestGuard};
pub use jwt::{Claims, CredentialPair, TokenService};
pub use rbac::{MemoryPolicyAdapter, PolicyEnforcer, PolicyModel};
pub use service::AuthService;
pub use session::{MemorySessionBackend, SessionBackend, SessionStore};
