//! # estribo-cli
//!
//! Command-line front end for the stirrup pricing engine.
//!
//! ## Module Organization
//! ```text
//! estribo_cli/
//! ├── lib.rs          ◄─── You are here (startup, logging, run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── AppConfig from environment, currency formatting
//! ├── error.rs        ◄─── CliError with codes and exit statuses
//! └── commands/
//!     ├── mod.rs      ◄─── Context + dispatch
//!     ├── supplier.rs ◄─── supplier add|list|set-price|remove
//!     ├── item.rs     ◄─── item add|list|set-weight|remove
//!     ├── config.rs   ◄─── config show|set
//!     ├── unit_price.rs ◄─ unit-price set|list
//!     └── report.rs   ◄─── report detail|simulate|compare
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                             │
//! │  2. Initialize logging (stderr, RUST_LOG or the default filter)        │
//! │  3. Load AppConfig from ESTRIBO_* variables, apply --db                │
//! │  4. Open the database (WAL, migrations)                                │
//! │  5. Dispatch the command, write the result to stdout                   │
//! │  6. Close the pool                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use std::io::Write;

use estribo_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Context;
use config::AppConfig;
use error::{CliError, CliResult, ErrorCode};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=estribo=trace` - Show trace for estribo crates only
/// - Default: INFO, DEBUG for estribo crates
///
/// Logs go to stderr so stdout stays clean for reports and `--json`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,estribo=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the database named by the configuration and runs one command.
pub async fn run(cli: Cli, mut config: AppConfig, out: &mut dyn Write) -> CliResult<()> {
    if let Some(path) = cli.db {
        config.db_path = path;
    }

    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::new(
                ErrorCode::DatabaseError,
                format!("Cannot create {}: {}", parent.display(), e),
            )
        })?;
    }

    info!(db_path = %config.db_path.display(), "Opening pricing database");
    let db = Database::new(DbConfig::new(&config.db_path)).await?;

    let ctx = Context {
        db: &db,
        config: &config,
        json: cli.json,
    };
    let result = commands::dispatch(ctx, cli.command, out).await;

    db.close().await;
    result
}
