//! Session identifier generation and the access → refresh derivation.
//!
//! A refresh session id is never random: it is `"{access_sid}++{principal_id}"`,
//! so revoking an access session can always locate its refresh partner.

use uuid::Uuid;

const SEPARATOR: &str = "++";

/// Fresh random access session identifier.
pub fn new_access_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive the refresh session id paired with `access_session_id`.
pub fn refresh_session_id(access_session_id: &str, principal_id: &str) -> String {
    format!("{access_session_id}{SEPARATOR}{principal_id}")
}

/// Recover the access session id from a refresh session id, if it was
/// derived for `principal_id`.
pub fn access_session_id_of<'a>(refresh_session_id: &'a str, principal_id: &str) -> Option<&'a str> {
    refresh_session_id
        .strip_suffix(principal_id)?
        .strip_suffix(SEPARATOR)
        .filter(|access| !access.is_empty())
}
