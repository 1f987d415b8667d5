//! Connection configuration resolved from the process environment.
//!
//! The configuration is resolved once at startup and passed by reference into
//! the connector; nothing reads the environment after that point.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Primary address override (`host:port`)
pub const ENV_ADDR: &str = "DB_ADDR";
/// Fallback address, typically the locally exposed container port
pub const ENV_LOCAL_ADDR: &str = "DB_LOCAL_ADDR";
/// Database name
pub const ENV_NAME: &str = "DB_NAME";
/// Optional user to authenticate with
pub const ENV_USER: &str = "DB_USER";
/// Optional password to authenticate with
pub const ENV_PASS: &str = "DB_PASS";
/// Server-side execution time ceiling in seconds
pub const ENV_MAX_EXECUTION_TIME: &str = "DB_MAX_EXECUTION_TIME";
/// Whether ledger inserts are acknowledged asynchronously
pub const ENV_ASYNC_INSERT: &str = "DB_ASYNC_INSERT";

/// Database name used when `DB_NAME` is unset
pub const DEFAULT_DATABASE: &str = "logme";
/// Suffix appended to the database name in test mode
pub const TEST_SUFFIX: &str = "_test";
/// Default `max_execution_time` applied to every statement, in seconds
pub const DEFAULT_MAX_EXECUTION_TIME: u64 = 60;

/// Which database a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The regular database
    #[default]
    Production,
    /// The `_test` suffixed database
    Test,
}

impl Mode {
    /// Suffix appended to the configured database name
    pub fn database_suffix(&self) -> &'static str {
        match self {
            Mode::Production => "",
            Mode::Test => TEST_SUFFIX,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Production => write!(f, "production"),
            Mode::Test => write!(f, "test"),
        }
    }
}

/// Resolved connection parameters for the analytical store
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Server address, `host:port` or a full URL
    pub addr: String,

    /// Database name, already suffixed for test mode
    pub database: String,

    /// User to authenticate with
    pub username: Option<String>,

    /// Password to authenticate with
    pub password: Option<String>,

    /// Mode the database name was resolved for
    pub mode: Mode,

    /// Server-side statement time limit in seconds
    pub max_execution_time: u64,

    /// Acknowledge ledger inserts without waiting for them to be flushed
    pub async_insert: bool,
}

impl ConnectionConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env(mode: Mode) -> CoreResult<Self> {
        Self::from_lookup(mode, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones. Only a missing
    /// address is an error; every other parameter has a default.
    pub fn from_lookup<F>(mode: Mode, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = var(ENV_ADDR)
            .or_else(|| var(ENV_LOCAL_ADDR))
            .ok_or_else(|| CoreError::ConfigMissing {
                names: format!("{ENV_ADDR} or {ENV_LOCAL_ADDR}"),
            })?;

        let base = var(ENV_NAME).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let database = format!("{}{}", base, mode.database_suffix());

        let max_execution_time = match var(ENV_MAX_EXECUTION_TIME) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| CoreError::ConfigInvalid {
                    name: ENV_MAX_EXECUTION_TIME.to_string(),
                    message: format!("'{raw}' is not a number of seconds: {e}"),
                })?,
            None => DEFAULT_MAX_EXECUTION_TIME,
        };

        let async_insert = match var(ENV_ASYNC_INSERT) {
            Some(raw) => parse_flag(ENV_ASYNC_INSERT, &raw)?,
            None => true,
        };

        let config = Self {
            addr: addr.trim().to_string(),
            database,
            username: var(ENV_USER),
            password: var(ENV_PASS),
            mode,
            max_execution_time,
            async_insert,
        };
        log::debug!("Resolved connection config: {config:?}");
        Ok(config)
    }

    /// HTTP endpoint for the configured address.
    ///
    /// Bare `host:port` addresses are assumed to be plain HTTP.
    pub fn url(&self) -> String {
        if self.addr.starts_with("http://") || self.addr.starts_with("https://") {
            self.addr.clone()
        } else {
            format!("http://{}", self.addr)
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("addr", &self.addr)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .field("max_execution_time", &self.max_execution_time)
            .field("async_insert", &self.async_insert)
            .finish()
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(user) => write!(f, "{}@{}/{}", user, self.addr, self.database),
            None => write!(f, "{}/{}", self.addr, self.database),
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> CoreResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::ConfigInvalid {
            name: name.to_string(),
            message: format!("expected a boolean, found '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
