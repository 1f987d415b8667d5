//! Sequential migration runner.
//!
//! Applies every unrecorded `.sql` file in a directory, in lexicographic file
//! name order, one at a time:
//!
//! 1. skip the file if the ledger already has it
//! 2. execute its body verbatim; a body with no statements is an error
//! 3. append a ledger row stamped with the current time
//!
//! The first error ends the run. Later migrations may depend on earlier ones,
//! so nothing after a failure is attempted.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::Ledger;
use lm_core::{discover, MigrationFile, MigrationRecord};
use lm_db::{split_statements, Database, DbError};
use std::collections::HashMap;
use std::path::Path;

/// Callback invoked after each migration is applied and recorded
type Notifier<'a> = Box<dyn Fn(&MigrationFile) + Send + Sync + 'a>;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files applied by this run, in order
    pub applied: Vec<String>,

    /// Files skipped because the ledger already had them
    pub skipped: Vec<String>,
}

/// Applied/pending state of one migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration file name
    pub name: String,

    /// Earliest ledger row for the file, if it has been applied
    pub applied: Option<MigrationRecord>,
}

impl MigrationStatus {
    /// Whether the file has been applied
    pub fn is_applied(&self) -> bool {
        self.applied.is_some()
    }
}

/// Applies migration files against a database
pub struct Runner<'a> {
    db: &'a dyn Database,
    ledger: Ledger<'a>,
    notifier: Option<Notifier<'a>>,
}

impl<'a> Runner<'a> {
    /// Runner using the default ledger table
    pub fn new(db: &'a dyn Database) -> Self {
        Self::with_ledger(db, Ledger::new(db))
    }

    /// Runner using a specific ledger
    pub fn with_ledger(db: &'a dyn Database, ledger: Ledger<'a>) -> Self {
        Self {
            db,
            ledger,
            notifier: None,
        }
    }

    /// Call `notify` after each migration is applied and recorded.
    pub fn on_applied<F>(mut self, notify: F) -> Self
    where
        F: Fn(&MigrationFile) + Send + Sync + 'a,
    {
        self.notifier = Some(Box::new(notify));
        self
    }

    /// The ledger this runner records into
    pub fn ledger(&self) -> &Ledger<'a> {
        &self.ledger
    }

    /// Apply every unrecorded migration in `dir`.
    ///
    /// The ledger table must already exist (see [`Ledger::ensure_table`]).
    /// A file recorded during this run is never looked up again in the same
    /// run, so eventual visibility of ledger inserts is sufficient.
    pub async fn run_all(&self, dir: &Path) -> MigrateResult<RunSummary> {
        let migrations = discover(dir).map_err(MigrateError::Io)?;
        log::debug!(
            "Found {} migration file(s) in {}",
            migrations.len(),
            dir.display()
        );

        let mut summary = RunSummary::default();
        for migration in &migrations {
            if self.ledger.has_run(&migration.name).await? {
                log::debug!("Skipping already applied migration {}", migration.name);
                summary.skipped.push(migration.name.clone());
                continue;
            }

            self.apply(migration).await?;
            summary.applied.push(migration.name.clone());
        }

        log::info!(
            "Migration run complete: {} applied, {} already applied",
            summary.applied.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Execute one migration and record it.
    async fn apply(&self, migration: &MigrationFile) -> MigrateResult<()> {
        let sql = migration.read_sql().map_err(MigrateError::Io)?;

        if split_statements(&sql).is_empty() {
            return Err(MigrateError::Execution {
                name: migration.name.clone(),
                source: DbError::ExecutionError("migration contains no statements".to_string()),
            });
        }

        log::debug!("Applying migration {}", migration.name);
        self.db
            .execute_batch(&sql)
            .await
            .map_err(|source| MigrateError::Execution {
                name: migration.name.clone(),
                source,
            })?;

        self.ledger
            .record(&MigrationRecord::now(&migration.name))
            .await?;

        log::debug!("Recorded migration {}", migration.name);
        if let Some(notify) = &self.notifier {
            notify(migration);
        }
        Ok(())
    }

    /// Migrations in `dir` that a run would apply, in order.
    ///
    /// A missing ledger table means nothing has been applied yet.
    pub async fn pending(&self, dir: &Path) -> MigrateResult<Vec<MigrationFile>> {
        let migrations = discover(dir).map_err(MigrateError::Io)?;
        if !self.ledger.exists().await? {
            return Ok(migrations);
        }

        let mut pending = Vec::new();
        for migration in migrations {
            if !self.ledger.has_run(&migration.name).await? {
                pending.push(migration);
            }
        }
        Ok(pending)
    }

    /// Applied/pending state of every migration in `dir`.
    pub async fn status(&self, dir: &Path) -> MigrateResult<Vec<MigrationStatus>> {
        let migrations = discover(dir).map_err(MigrateError::Io)?;
        let records = if self.ledger.exists().await? {
            self.ledger.records().await?
        } else {
            Vec::new()
        };

        // Records arrive ordered by (name, applied_at); keep the first per name
        let mut first_applied: HashMap<String, MigrationRecord> = HashMap::new();
        for record in records {
            first_applied.entry(record.name.clone()).or_insert(record);
        }

        Ok(migrations
            .into_iter()
            .map(|migration| MigrationStatus {
                applied: first_applied.remove(&migration.name),
                name: migration.name,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
