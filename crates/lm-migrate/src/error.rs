//! Error types for the migration ledger and runner.

use lm_core::CoreError;
use lm_db::DbError;
use thiserror::Error;

/// Migration errors.
///
/// Every variant is fatal for the run that produced it.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Required configuration missing or invalid (M001).
    #[error("[M001] Configuration error")]
    Config(#[source] CoreError),

    /// The store is unreachable or rejected the credentials (M002).
    #[error("[M002] Could not connect to the database")]
    Connection(#[source] DbError),

    /// A ledger probe or lookup failed for a reason other than "no rows" (M003).
    #[error("[M003] Migration ledger query failed")]
    Query(#[source] DbError),

    /// A migration body failed to execute; nothing was recorded for it (M004).
    #[error("[M004] Migration {name} failed")]
    Execution {
        name: String,
        #[source]
        source: DbError,
    },

    /// A migration ran but its ledger entry could not be written (M005).
    ///
    /// The schema change is already committed; the file will be attempted
    /// again on the next run.
    #[error("[M005] Migration {name} was applied but not recorded; it will run again next time")]
    Record {
        name: String,
        #[source]
        source: DbError,
    },

    /// Migration files could not be listed or read (M006).
    #[error("[M006] Could not read migration files")]
    Io(#[source] CoreError),

    /// The ledger table could not be created (M007).
    #[error("[M007] Could not create migration ledger table {table}")]
    LedgerSetup {
        table: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
