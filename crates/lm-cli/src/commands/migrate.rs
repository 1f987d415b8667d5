//! Migrate command implementation

use anyhow::Result;
use lm_core::Mode;
use lm_db::Database;
use lm_migrate::Runner;
use std::path::Path;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{connect, resolve_config};

/// Execute the migrate / migrate-test command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs, mode: Mode) -> Result<()> {
    let config = resolve_config(mode)?;
    let db = connect(&config).await?;

    if args.dry_run {
        return dry_run(&db, &global.migrations_dir).await;
    }
    apply(&db, &global.migrations_dir).await
}

/// Create the ledger table if needed, then apply every pending migration.
pub(crate) async fn apply(db: &dyn Database, dir: &Path) -> Result<()> {
    let runner = Runner::new(db)
        .on_applied(|migration| println!("Successfully migrated: {}", migration.name));

    runner.ledger().ensure_table().await?;
    let summary = runner.run_all(dir).await?;

    if summary.applied.is_empty() {
        println!("No pending migrations");
    }
    Ok(())
}

/// List what a run would apply without executing anything.
async fn dry_run(db: &dyn Database, dir: &Path) -> Result<()> {
    let pending = Runner::new(db).pending(dir).await?;

    if pending.is_empty() {
        println!("No pending migrations");
        return Ok(());
    }

    println!("Dry run - would apply the following migrations:");
    for migration in &pending {
        println!("  {}", migration.name);
    }
    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
