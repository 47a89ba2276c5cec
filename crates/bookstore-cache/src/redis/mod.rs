//! Redis connection management.

pub mod client;

pub use client::RedisClient;
