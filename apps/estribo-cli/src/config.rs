//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`)
//! 2. Environment variables (`ESTRIBO_*`)
//! 3. Defaults (this file)
//!
//! The margin and tax rate are NOT configured here: they live in the
//! record store and are changed with `estribo config set`.

use std::path::PathBuf;

use directories::ProjectDirs;
use estribo_core::DEFAULT_SIMULATION_ITEM_LIMIT;
use serde::Serialize;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places shown for amounts
    pub currency_decimals: u8,

    /// How many items a simulation covers when `--limit` is not given
    pub simulation_limit: usize,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: platform data directory, `estribos.db`
    /// - Currency: `$` with 2 decimals
    /// - Simulation: first 3 items
    fn default() -> Self {
        AppConfig {
            db_path: default_database_path(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            simulation_limit: DEFAULT_SIMULATION_ITEM_LIMIT,
        }
    }
}

impl AppConfig {
    /// Creates the configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ESTRIBO_DB_PATH`: Database file
    /// - `ESTRIBO_CURRENCY_SYMBOL`: e.g. `"ARS $"`
    /// - `ESTRIBO_CURRENCY_DECIMALS`: 0 to 6
    /// - `ESTRIBO_SIMULATION_LIMIT`: Items per simulation
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("ESTRIBO_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(symbol) = lookup("ESTRIBO_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("ESTRIBO_CURRENCY_DECIMALS") {
            if let Ok(decimals) = decimals.trim().parse::<u8>() {
                config.currency_decimals = decimals.min(6);
            }
        }

        if let Some(limit) = lookup("ESTRIBO_SIMULATION_LIMIT") {
            if let Ok(limit) = limit.trim().parse::<usize>() {
                config.simulation_limit = limit;
            }
        }

        config
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(201.1625), "$201.16");
    /// assert_eq!(config.format_currency(-5.0), "-$5.00");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        let decimals = self.currency_decimals as usize;
        let formatted = format!("{:.*}", decimals, amount.abs());

        // -0.001 rounds to "0.00", which should not carry a sign
        let negative = amount < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');

        format!(
            "{}{}{}",
            if negative { "-" } else { "" },
            self.currency_symbol,
            formatted
        )
    }
}

/// Formats a percentage with two decimals, `"-"` when undefined.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(pct) => format!("{:.2}%", pct),
        None => "-".to_string(),
    }
}

/// Determines the default database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.estribo.pricing/estribos.db`
/// - **Windows**: `%APPDATA%\estribo\pricing\data\estribos.db`
/// - **Linux**: `~/.local/share/pricing/estribos.db`
///
/// Falls back to the working directory when no home directory is known.
fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "estribo", "pricing")
        .map(|dirs| dirs.data_dir().join("estribos.db"))
        .unwrap_or_else(|| PathBuf::from("estribos.db"))
}
