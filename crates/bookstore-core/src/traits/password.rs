//! One-way credential comparison port.

use crate::result::AppResult;

/// Compares a plaintext password against a stored one-way hash.
///
/// Hashing and storage are owned by the embedding application; the auth
/// core only asks whether a candidate matches.
pub trait PasswordVerifier: Send + Sync + 'static {
    /// Returns `Ok(true)` when `password` matches `hash`.
    ///
    /// An `Err` means the hash itself could not be interpreted.
    fn verify(&self, password: &str, hash: &str) -> AppResult<bool>;
}
