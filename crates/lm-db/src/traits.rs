//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use lm_core::MigrationRecord;

/// Database abstraction used by the migration ledger and runner
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a script of one or more statements, in order
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table exists in the current database
    async fn table_exists(&self, table: &str) -> DbResult<bool>;

    /// Create the ledger table, ordered by `(name, applied_at)`
    async fn create_ledger_table(&self, table: &str) -> DbResult<()>;

    /// Whether at least one ledger row exists for `name`
    async fn ledger_contains(&self, table: &str, name: &str) -> DbResult<bool>;

    /// Append a ledger row
    ///
    /// Visibility to later reads is eventual: callers must not read back a
    /// row they just appended within the same run.
    async fn ledger_append(&self, table: &str, record: &MigrationRecord) -> DbResult<()>;

    /// All ledger rows ordered by name then time
    async fn ledger_records(&self, table: &str) -> DbResult<Vec<MigrationRecord>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
