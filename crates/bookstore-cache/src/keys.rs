//! Cache key builders for session records.
//!
//! Centralising key construction keeps the Redis layout in one place.
//! The configured client prefix is applied on top of these keys.

/// Cache key for a live session record (access or refresh).
pub fn session(session_id: &str) -> String {
    format!("session:{session_id}")
}
