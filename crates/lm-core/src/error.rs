//! Error types for lm-core

use thiserror::Error;

/// Core error type for logme-cli
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Required environment variable missing
    #[error("[C001] Environment variable {names} required for migrations")]
    ConfigMissing { names: String },

    /// C002: Environment variable present but unusable
    #[error("[C002] Invalid value for {name}: {message}")]
    ConfigInvalid { name: String, message: String },

    /// C003: Migrations directory could not be listed
    #[error("[C003] Failed to read migrations directory '{path}'")]
    MigrationsDir {
        path: String,
        source: std::io::Error,
    },

    /// C004: IO error with file path context
    #[error("[C004] Failed to read '{path}'")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
