//! # bookstore-core
//!
//! Core crate for the bookstore authentication and authorization layer.
//! Contains the ports the auth core consumes (principal lookup, password
//! comparison, policy persistence), configuration schemas, shared policy
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other bookstore crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
