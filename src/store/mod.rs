//! Persistence layer — libSQL-backed storage for onboarding progress.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlProfileStore;
pub use traits::ProfileStore;
