//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use estribo_core::PricingMode;

/// Price stirrups from supplier costs and compare suppliers.
#[derive(Parser, Debug)]
#[command(name = "estribo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides ESTRIBO_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage suppliers
    Supplier {
        #[command(subcommand)]
        action: SupplierCommand,
    },
    /// Manage items and their per-supplier weights
    Item {
        #[command(subcommand)]
        action: ItemCommand,
    },
    /// Show or change the sale configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Manage fixed, tax-inclusive unit prices
    UnitPrice {
        #[command(subcommand)]
        action: UnitPriceCommand,
    },
    /// Pricing reports
    Report {
        #[command(subcommand)]
        report: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SupplierCommand {
    /// Add a supplier
    Add {
        name: String,
        /// Price per kilogram
        #[arg(long)]
        price_per_kg: f64,
    },
    /// List suppliers
    List,
    /// Change a supplier's price per kilogram
    SetPrice { id: String, price_per_kg: f64 },
    /// Remove a supplier and its recorded weights
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add an item
    Add {
        /// Size label, e.g. "4.2mm 10x10"
        size_label: String,
        /// Weight per unit for a supplier, as SUPPLIER_ID=KG (repeatable)
        #[arg(long = "weight", value_name = "SUPPLIER_ID=KG", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,
    },
    /// List items with their weights
    List,
    /// Record an item's weight for one supplier
    SetWeight {
        item_id: String,
        supplier_id: String,
        weight_kg: f64,
    },
    /// Remove an item
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the margin and tax rate
    Show,
    /// Change the margin and/or tax rate
    Set {
        /// Profit margin in percent
        #[arg(long)]
        margin: Option<f64>,
        /// Output tax in percent
        #[arg(long)]
        tax: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UnitPriceCommand {
    /// Set an item's fixed price (0 clears it)
    Set { item_id: String, price: f64 },
    /// List fixed prices
    List,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Per item and supplier price breakdown
    Detail {
        #[arg(long, value_enum, default_value = "weight")]
        mode: ModeArg,
    },
    /// Project a batch sale per item and supplier
    Simulate {
        #[arg(long, value_enum, default_value = "weight")]
        mode: ModeArg,
        /// Only show totals for this supplier (id or name)
        #[arg(long)]
        supplier: Option<String>,
        /// Number of items to simulate
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Compare suppliers item by item
    Compare,
}

/// Pricing strategy selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Cost × (1 + margin) + tax
    Weight,
    /// Manually set unit price
    Fixed,
}

impl From<ModeArg> for PricingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Weight => PricingMode::WeightBased,
            ModeArg::Fixed => PricingMode::FixedPrice,
        }
    }
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (supplier, kg) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SUPPLIER_ID=KG, got '{s}'"))?;
    let kg: f64 = kg
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}'", kg.trim()))?;
    Ok((supplier.trim().to_string(), kg))
}
