//! lm-db - Database layer for logme-cli
//!
//! This crate provides the `Database` trait used by the migration ledger and
//! runner, and its ClickHouse implementation.

pub mod clickhouse;
pub mod error;
pub mod statements;
pub mod traits;

pub use self::clickhouse::ClickHouseBackend;
pub use error::{DbError, DbResult};
pub use statements::split_statements;
pub use traits::Database;
