//! The migration ledger: which migration files have already been applied.
//!
//! The ledger is append-only. Duplicate rows for a name are tolerated; a name
//! counts as applied as soon as one row exists for it.

use crate::error::{MigrateError, MigrateResult};
use lm_core::MigrationRecord;
use lm_db::Database;

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "migrations";

/// Ledger of applied migrations, stored in the target database
pub struct Ledger<'a> {
    db: &'a dyn Database,
    table: String,
}

impl<'a> Ledger<'a> {
    /// Ledger backed by the default `migrations` table
    pub fn new(db: &'a dyn Database) -> Self {
        Self::with_table(db, LEDGER_TABLE)
    }

    /// Ledger backed by a custom table
    pub fn with_table(db: &'a dyn Database, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table unless it already exists.
    ///
    /// Returns `true` when the table was created by this call.
    pub async fn ensure_table(&self) -> MigrateResult<bool> {
        if self.exists().await? {
            log::debug!("Ledger table {} already exists", self.table);
            return Ok(false);
        }

        self.db
            .create_ledger_table(&self.table)
            .await
            .map_err(|source| MigrateError::LedgerSetup {
                table: self.table.clone(),
                source,
            })?;
        log::info!("Created ledger table {}", self.table);
        Ok(true)
    }

    /// Whether the ledger table is present
    pub async fn exists(&self) -> MigrateResult<bool> {
        self.db
            .table_exists(&self.table)
            .await
            .map_err(MigrateError::Query)
    }

    /// Whether `name` has at least one ledger row.
    ///
    /// An empty lookup is `false`; any other failure is an error.
    pub async fn has_run(&self, name: &str) -> MigrateResult<bool> {
        self.db
            .ledger_contains(&self.table, name)
            .await
            .map_err(MigrateError::Query)
    }

    /// Append a ledger row for an applied migration.
    ///
    /// The row may not be readable until a later invocation.
    pub async fn record(&self, record: &MigrationRecord) -> MigrateResult<()> {
        self.db
            .ledger_append(&self.table, record)
            .await
            .map_err(|source| MigrateError::Record {
                name: record.name.clone(),
                source,
            })
    }

    /// Every ledger row, ordered by name then time
    pub async fn records(&self) -> MigrateResult<Vec<MigrationRecord>> {
        self.db
            .ledger_records(&self.table)
            .await
            .map_err(MigrateError::Query)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
