//! Migration files on disk and the records kept for them.
//!
//! A migration is a `.sql` file directly inside the migrations directory. Its
//! file name is its identity; the ledger stores one [`MigrationRecord`] per
//! applied file. Files are applied in lexicographic file name order, so
//! authors prefix names with a sequence number or timestamp.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension recognised as a migration
pub const MIGRATION_EXTENSION: &str = "sql";

/// Directory migrations are read from unless overridden
pub const DEFAULT_MIGRATIONS_DIR: &str = "internal/logme/migrations";

/// A migration script discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Base file name, used as the ledger key
    pub name: String,

    /// Full path to the file
    pub path: PathBuf,
}

impl MigrationFile {
    /// Read the full SQL body, unmodified.
    pub fn read_sql(&self) -> CoreResult<String> {
        fs::read_to_string(&self.path).map_err(|source| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// One ledger entry: a migration that was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Migration file name
    pub name: String,

    /// When the migration ran, in seconds since the unix epoch
    pub applied_at: u32,
}

impl MigrationRecord {
    /// Create a record stamped with the current time.
    pub fn now(name: impl Into<String>) -> Self {
        let applied_at = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        Self {
            name: name.into(),
            applied_at,
        }
    }

    /// The `applied_at` timestamp as a UTC datetime.
    pub fn applied_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.applied_at), 0)
    }
}

/// Whether a file name carries the migration extension.
///
/// The match is case-sensitive: `001.SQL` is not a migration.
pub fn is_migration_file(name: &str) -> bool {
    name.strip_suffix(MIGRATION_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// List the migrations in `dir`, sorted by file name.
///
/// The listing is not recursive. Directories and files without the
/// migration extension are ignored.
pub fn discover(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let dir_err = |source| CoreError::MigrationsDir {
        path: dir.display().to_string(),
        source,
    };

    let mut migrations = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(String::from) else {
            log::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };

        if !is_migration_file(&name) {
            log::debug!("Skipping non-migration file: {name}");
            continue;
        }

        migrations.push(MigrationFile { name, path });
    }

    migrations.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(migrations)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
