//! # estribo
//!
//! Entry point for the stirrup pricing CLI.
//!
//! ## Usage
//! ```bash
//! estribo supplier add Acindar --price-per-kg 2500
//! estribo item add "4.2mm 10x10" --weight <SUPPLIER_ID>=0.035
//! estribo report detail --mode weight
//! estribo report simulate --supplier Acindar --json
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;
use estribo_cli::cli::Cli;
use estribo_cli::config::AppConfig;
use estribo_cli::{init_tracing, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    let config = AppConfig::from_env();
    let mut stdout = io::stdout().lock();

    match run(cli, config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match serde_json::to_string(&err) {
                Ok(encoded) if json => eprintln!("{encoded}"),
                _ => eprintln!("{err}"),
            }
            ExitCode::from(err.exit_status())
        }
    }
}
