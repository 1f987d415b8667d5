//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use lm_core::migration::DEFAULT_MIGRATIONS_DIR;
use std::path::PathBuf;

/// logme - A tool to help with commands for the LogMe app
#[derive(Parser, Debug)]
#[command(name = "logme")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing migration files
    #[arg(
        short = 'd',
        long,
        global = true,
        env = "LOGME_MIGRATIONS_DIR",
        default_value = DEFAULT_MIGRATIONS_DIR
    )]
    pub migrations_dir: PathBuf,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the database
    #[command(
        visible_alias = "m",
        long_about = "Migrate the database using the environment variables (.env or otherwise):\n\
                      \n  DB_ADDR        host and port of the database\
                      \n  DB_LOCAL_ADDR  host and port, used when DB_ADDR is unset\
                      \n  DB_NAME        name of the database to migrate (defaults to 'logme')\
                      \n  DB_USER        (optional) user to authenticate with\
                      \n  DB_PASS        (optional) password to authenticate with"
    )]
    Migrate(MigrateArgs),

    /// Migrate the test database
    #[command(
        visible_alias = "mt",
        long_about = "Migrate the test database using the same environment variables as \
                      `migrate`; '_test' is appended to DB_NAME (defaults to 'logme_test')."
    )]
    MigrateTest(MigrateArgs),

    /// Show applied and pending migrations
    #[command(visible_alias = "s")]
    Status(StatusArgs),

    /// Start logme docker containers
    #[command(visible_alias = "u")]
    Up,

    /// Stop logme docker containers
    #[command(visible_alias = "d")]
    Down,

    /// List logme docker containers
    #[command(visible_alias = "l")]
    List,

    /// Run logme tests inside the server container
    #[command(visible_alias = "t")]
    Test,
}

/// Arguments for the migrate and migrate-test commands
#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Report on the test database
    #[arg(long)]
    pub test: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
