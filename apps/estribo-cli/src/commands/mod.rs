//! # Commands
//!
//! One module per top-level subcommand. Every command receives a
//! [`Context`] and writes to a caller-supplied sink, so tests can run them
//! against an in-memory database and inspect the output.
//!
//! ## Available Commands
//! - `supplier` - Supplier CRUD and price changes
//! - `item` - Items and per-supplier weights
//! - `config` - Margin and tax rate
//! - `unit-price` - Fixed unit prices
//! - `report` - Detail, simulation and comparison reports

pub mod config;
pub mod item;
pub mod report;
pub mod supplier;
pub mod unit_price;

use std::io::Write;

use estribo_db::Database;
use serde::Serialize;
use tracing::debug;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::CliResult;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub db: &'a Database,
    pub config: &'a AppConfig,

    /// Print JSON instead of tables.
    pub json: bool,
}

/// Routes a parsed command to its handler.
pub async fn dispatch(ctx: Context<'_>, command: Command, out: &mut dyn Write) -> CliResult<()> {
    debug!(?command, json = ctx.json, "Dispatching command");

    match command {
        Command::Supplier { action } => supplier::run(ctx, action, out).await,
        Command::Item { action } => item::run(ctx, action, out).await,
        Command::Config { action } => config::run(ctx, action, out).await,
        Command::UnitPrice { action } => unit_price::run(ctx, action, out).await,
        Command::Report { report } => report::run(ctx, report, out).await,
    }
}

/// Writes a value as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use estribo_db::DbConfig;

    /// In-memory database plus default configuration.
    pub async fn setup() -> (Database, AppConfig) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig::from_lookup(|_| None);
        (db, config)
    }

    /// Runs a command line (without the program name) and returns stdout.
    pub async fn run_line(db: &Database, config: &AppConfig, args: &[&str]) -> CliResult<String> {
        use clap::Parser;

        let cli = crate::cli::Cli::try_parse_from(std::iter::once("estribo").chain(args.iter().copied()))
            .unwrap();
        let ctx = Context {
            db,
            config,
            json: cli.json,
        };

        let mut out = Vec::new();
        dispatch(ctx, cli.command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }
}
