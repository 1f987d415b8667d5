//! logme CLI - database migrations and local container stack helpers

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::shell::ShellRunner;
use commands::{containers, migrate, status};
use lm_core::Mode;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // `.env` may set RUST_LOG, so it is loaded before the logger reads it
    let dotenv = dotenvy::dotenv();
    logger(cli.global.verbose).init();
    report_dotenv(dotenv);

    if let Err(err) = dispatch(&cli).await {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        return Err(err);
    }
    Ok(())
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let shell = ShellRunner;
    match &cli.command {
        Commands::Migrate(args) => migrate::execute(args, &cli.global, Mode::Production).await,
        Commands::MigrateTest(args) => migrate::execute(args, &cli.global, Mode::Test).await,
        Commands::Status(args) => status::execute(args, &cli.global).await,
        Commands::Up => containers::execute(containers::Action::Up, &shell).await,
        Commands::Down => containers::execute(containers::Action::Down, &shell).await,
        Commands::List => containers::execute(containers::Action::List, &shell).await,
        Commands::Test => containers::execute(containers::Action::Test, &shell).await,
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or info with `--verbose`.
fn logger(verbose: bool) -> env_logger::Builder {
    let default_filter = if verbose { "info" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    );
    builder.format_timestamp(None);
    builder
}

/// Log the outcome of loading `.env`, which happens before the logger exists.
fn report_dotenv(result: dotenvy::Result<PathBuf>) {
    match result {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => log::debug!("No .env file found"),
        Err(err) => log::warn!("Failed to load .env file: {err}"),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
