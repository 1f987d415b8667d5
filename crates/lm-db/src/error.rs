//! Error types for lm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Metadata or ledger query error (D002)
    #[error("[D002] Query failed: {0}")]
    QueryError(String),

    /// Statement execution error (D003)
    #[error("[D003] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Insert error (D004)
    #[error("[D004] Insert failed: {0}")]
    InsertError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
