//! lm-core - Core library for logme-cli
//!
//! This crate provides the connection configuration resolved from the process
//! environment, migration file discovery, and the shared migration types used
//! by the database, ledger, and CLI crates.

pub mod config;
pub mod error;
pub mod migration;

pub use config::{ConnectionConfig, Mode};
pub use error::{CoreError, CoreResult};
pub use migration::{discover, MigrationFile, MigrationRecord};
