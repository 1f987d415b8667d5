//! Migration ledger and runner for logme-cli.
//!
//! The [`Ledger`] records which migration files have been applied; the
//! [`Runner`] applies every unrecorded file in a directory, in file name
//! order, stopping at the first failure. Nothing is rolled back: the store
//! has no transactional DDL, so a failed run leaves its partial state for
//! inspection.

pub mod error;
pub mod ledger;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LEDGER_TABLE};
pub use runner::{MigrationStatus, RunSummary, Runner};
