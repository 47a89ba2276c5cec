//! # bookstore-cache
//!
//! Redis plumbing for the session store: a reconnecting connection
//! manager wrapper with key prefixing, and the key builders for every
//! record the auth core keeps in Redis.

pub mod keys;
pub mod redis;

pub use self::redis::RedisClient;
