//! Ports defined in `bookstore-core` and implemented outside the auth core.

pub mod directory;
pub mod password;
pub mod policy;

pub use directory::PrincipalDirectory;
pub use password::PasswordVerifier;
pub use policy::PolicyAdapter;
