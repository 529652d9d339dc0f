//! # estribo-core: Pure Pricing Engine for Stirrup Sales
//!
//! This crate is the **heart** of the stirrup calculator. It turns supplier
//! prices, per-supplier item weights and the sale configuration into unit
//! costs, sale prices, tax liabilities and bulk-sale projections.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stirrup Pricing Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    estribo-cli (commands)                       │   │
//! │  │    supplier add ──► item add ──► config set ──► report ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PricingSnapshot                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ estribo-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │  pricing  │  │ simulation │  │comparison │ │   │
//! │  │   │ Supplier  │  │ Detailed  │  │ ×1000 unit │  │  spreads  │ │   │
//! │  │   │   Item    │  │Calculation│  │  batches   │  │  by item  │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SHARED STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                 estribo-db (record store)                       │   │
//! │  │        SQLite tables, migrations, load_snapshot()               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Supplier, Item, SaleConfiguration, ...)
//! - [`pricing`] - Per-unit detailed calculations in both pricing modes
//! - [`simulation`] - 1000-unit batch projections and supplier totals
//! - [`comparison`] - Cross-supplier analytics
//! - [`validation`] - Write-side input checks used by the store
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, bit-identical records out
//! 2. **Configuration is an argument**: the active [`SaleConfiguration`] is
//!    passed into every call, never read from ambient state
//! 3. **Total**: missing weights, missing fixed prices, empty catalogs all
//!    yield empty or zero-valued output, never an error
//! 4. **No caching**: every call re-derives from its inputs
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use estribo_core::{pricing, Item, SaleConfiguration, Supplier};
//!
//! let suppliers = vec![Supplier::new("s1", "Acindar", 2500.0)];
//! let items = vec![Item::new("i1", "4.2mm 10x10", BTreeMap::from([("s1".to_string(), 0.035)]))];
//! let config = SaleConfiguration::new(90.0, 21.0);
//!
//! let calcs = pricing::weight_based(&items, &suppliers, &config);
//! assert!((calcs[0].base_cost - 87.5).abs() < 1e-9);
//! assert!((calcs[0].price_inc_tax - 201.1625).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod comparison;
pub mod error;
pub mod pricing;
pub mod simulation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use pricing::{DetailedCalculation, TaxNetting};
pub use simulation::{ItemSimulation, SimulatedBatch, SimulationOptions, SimulationTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate (percent) assumed to be already included in every supplier's
/// base cost.
///
/// ## Business Rule
/// The input tax credit is always extracted at this fixed rate, independent
/// of the configurable output tax rate in [`SaleConfiguration`]. The two
/// must not be unified.
///
/// Pending product-owner review: this may be a hardcoding in the pricing
/// sheet the calculator was built from rather than a deliberate rule.
pub const INPUT_TAX_RATE_PCT: f64 = 21.0;

/// Number of units in a simulated bulk sale.
pub const BATCH_UNITS: f64 = 1000.0;

/// Default number of items included in a bulk-sale simulation.
///
/// ## Business Reason
/// Keeps the simulation view focused on the first few catalog entries.
/// Override per call with [`SimulationOptions`].
pub const DEFAULT_SIMULATION_ITEM_LIMIT: usize = 3;

/// Absolute tolerance used when comparing derived figures in tests and
/// consistency checks.
pub const FLOAT_TOLERANCE: f64 = 1e-9;
