//! Core type definitions shared across the bookstore workspace.

pub mod policy;
pub mod principal;

pub use policy::{Action, PolicyRule};
pub use principal::Principal;
