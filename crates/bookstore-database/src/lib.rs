//! # bookstore-database
//!
//! PostgreSQL connection management, migrations, and the durable
//! policy persistence adapter used by the enforcer.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::policy::PgPolicyAdapter;
