//! Shared utilities for CLI commands

use anyhow::Result;
use lm_core::{ConnectionConfig, Mode};
use lm_db::{ClickHouseBackend, Database};
use lm_migrate::MigrateError;
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Resolve connection parameters for `mode` from the environment.
///
/// Runs before any connection attempt so a missing address never touches the
/// network.
pub(crate) fn resolve_config(mode: Mode) -> Result<ConnectionConfig> {
    Ok(ConnectionConfig::from_env(mode).map_err(MigrateError::Config)?)
}

/// Open the single connection used for the whole invocation.
pub(crate) async fn connect(config: &ConnectionConfig) -> Result<ClickHouseBackend> {
    log::info!("Connecting to {config} ({})", config.mode);
    let db = ClickHouseBackend::connect(config)
        .await
        .map_err(MigrateError::Connection)?;
    log::info!("Connected to {} database {}", db.db_type(), config.database);
    Ok(db)
}
