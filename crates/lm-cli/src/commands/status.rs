//! Status command implementation

use anyhow::Result;
use lm_core::Mode;
use lm_migrate::{MigrationStatus, Runner};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{connect, resolve_config};

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let mode = if args.test { Mode::Test } else { Mode::Production };
    let config = resolve_config(mode)?;
    let db = connect(&config).await?;

    let statuses = Runner::new(&db).status(&global.migrations_dir).await?;
    if statuses.is_empty() {
        println!(
            "No migrations found in {}",
            global.migrations_dir.display()
        );
        return Ok(());
    }

    for status in &statuses {
        println!("{}", format_status(status));
    }

    let applied = statuses.iter().filter(|s| s.is_applied()).count();
    println!();
    println!(
        "{} applied, {} pending ({})",
        applied,
        statuses.len() - applied,
        config
    );
    Ok(())
}

/// One line of status output: state, applied time, file name
fn format_status(status: &MigrationStatus) -> String {
    let applied_at = status
        .applied
        .as_ref()
        .and_then(|record| record.applied_at_utc())
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    match applied_at {
        Some(at) => format!("  applied  {:<23}  {}", at, status.name),
        None if status.is_applied() => format!("  applied  {:<23}  {}", "", status.name),
        None => format!("  pending  {:<23}  {}", "", status.name),
    }
}
