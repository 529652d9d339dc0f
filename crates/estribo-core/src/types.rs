//! # Domain Types
//!
//! Core domain types consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │    Supplier     │   │        Item          │   │ FixedUnitPrice  │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  id             │◄──│  weights[supplier]   │◄──│  item_id        │  │
//! │  │  name           │   │  size_label          │   │  unit_price     │  │
//! │  │  price_per_kg   │   │  id                  │   │  (tax incl.)    │  │
//! │  └─────────────────┘   └──────────────────────┘   └─────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────────────────────────┐ │
//! │  │ SaleConfiguration   │   │ PricingSnapshot                         │ │
//! │  │  margin_pct  (90)   │   │  everything above, read in one go,      │ │
//! │  │  tax_pct     (21)   │   │  never mutated by the engine            │ │
//! │  └─────────────────────┘   └─────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by an opaque string id (UUID v4 in the store).
//! The engine never interprets ids beyond equality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{self, DetailedCalculation};
use crate::simulation::{self, ItemSimulation, SimulationOptions};

// =============================================================================
// Supplier
// =============================================================================

/// A source of raw material billed per kilogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price per kilogram of finished stirrup.
    pub price_per_kg: f64,
}

impl Supplier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_kg: f64) -> Self {
        Supplier {
            id: id.into(),
            name: name.into(),
            price_per_kg,
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry (one stirrup size).
///
/// The same stirrup weighs differently depending on which supplier makes
/// it, so weight is recorded per supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    /// Unique identifier.
    pub id: String,

    /// Size / measure label, e.g. "4.2mm 10x10".
    pub size_label: String,

    /// Weight per unit in kilograms, keyed by supplier id.
    pub weights: BTreeMap<String, f64>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        size_label: impl Into<String>,
        weights: BTreeMap<String, f64>,
    ) -> Self {
        Item {
            id: id.into(),
            size_label: size_label.into(),
            weights,
        }
    }

    /// Weight per unit for the given supplier.
    ///
    /// A supplier with no recorded weight contributes zero cost, so a missing
    /// entry reads as `0.0` rather than an error.
    #[inline]
    pub fn weight_for(&self, supplier_id: &str) -> f64 {
        self.weights.get(supplier_id).copied().unwrap_or(0.0)
    }
}

// =============================================================================
// Sale Configuration
// =============================================================================

/// Margin and output tax applied to every weight-based calculation.
///
/// Exactly one configuration is active at a time. It is always passed to
/// the engine explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleConfiguration {
    /// Profit margin in percent, applied over base cost.
    pub margin_pct: f64,

    /// Output value-added tax in percent, applied over cost with margin.
    pub tax_pct: f64,
}

impl SaleConfiguration {
    pub const fn new(margin_pct: f64, tax_pct: f64) -> Self {
        SaleConfiguration { margin_pct, tax_pct }
    }
}

/// 90 % margin, 21 % tax: the values the store is seeded with.
impl Default for SaleConfiguration {
    fn default() -> Self {
        SaleConfiguration::new(90.0, 21.0)
    }
}

// =============================================================================
// Fixed Unit Price
// =============================================================================

/// A manually set, tax-inclusive sale price for one item.
///
/// A price of zero means "no fixed price": the item is left out of
/// fixed-price mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FixedUnitPrice {
    pub id: String,

    /// The item this price applies to.
    pub item_id: String,

    /// Sale price per unit, tax included.
    pub unit_price: f64,
}

impl FixedUnitPrice {
    pub fn new(id: impl Into<String>, item_id: impl Into<String>, unit_price: f64) -> Self {
        FixedUnitPrice {
            id: id.into(),
            item_id: item_id.into(),
            unit_price,
        }
    }

    /// Whether this price takes part in fixed-price mode.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.unit_price > 0.0
    }
}

// =============================================================================
// Pricing Mode
// =============================================================================

/// Which of the two pricing strategies produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PricingMode {
    /// Price derived from cost, margin and tax.
    #[default]
    WeightBased,
    /// Price taken from a manually set, tax-inclusive unit price.
    FixedPrice,
}

// =============================================================================
// Pricing Snapshot
// =============================================================================

/// Everything the engine needs, captured at one point in time.
///
/// The store is responsible for reading this consistently; the engine only
/// borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingSnapshot {
    pub suppliers: Vec<Supplier>,
    pub items: Vec<Item>,
    pub config: SaleConfiguration,
    pub fixed_prices: Vec<FixedUnitPrice>,
}

impl PricingSnapshot {
    /// Looks up the fixed price record for an item (first match wins).
    pub fn fixed_price_for(&self, item_id: &str) -> Option<&FixedUnitPrice> {
        pricing::fixed_price_for(&self.fixed_prices, item_id)
    }

    /// Weight-based detailed calculations for every item × supplier.
    pub fn weight_based(&self) -> Vec<DetailedCalculation> {
        pricing::weight_based(&self.items, &self.suppliers, &self.config)
    }

    /// Fixed-price detailed calculations for items with an active fixed price.
    pub fn fixed_price(&self) -> Vec<DetailedCalculation> {
        pricing::fixed_price(&self.items, &self.suppliers, &self.config, &self.fixed_prices)
    }

    /// Detailed calculations for the requested mode.
    pub fn calculations(&self, mode: PricingMode) -> Vec<DetailedCalculation> {
        match mode {
            PricingMode::WeightBased => self.weight_based(),
            PricingMode::FixedPrice => self.fixed_price(),
        }
    }

    /// Bulk-sale simulation in the requested mode.
    pub fn simulate(&self, mode: PricingMode, options: SimulationOptions) -> Vec<ItemSimulation> {
        match mode {
            PricingMode::WeightBased => {
                simulation::simulate_weight_based(&self.items, &self.suppliers, &self.config, options)
            }
            PricingMode::FixedPrice => simulation::simulate_fixed_price(
                &self.items,
                &self.suppliers,
                &self.config,
                &self.fixed_prices,
                options,
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weight_reads_as_zero() {
        let item = Item::new(
            "i1",
            "6mm 15x15",
            BTreeMap::from([("s1".to_string(), 0.12)]),
        );
        assert_eq!(item.weight_for("s1"), 0.12);
        assert_eq!(item.weight_for("s2"), 0.0);
    }

    #[test]
    fn test_sale_configuration_default() {
        let config = SaleConfiguration::default();
        assert_eq!(config.margin_pct, 90.0);
        assert_eq!(config.tax_pct, 21.0);
    }

    #[test]
    fn test_fixed_price_activity() {
        assert!(FixedUnitPrice::new("p1", "i1", 300.0).is_active());
        assert!(!FixedUnitPrice::new("p2", "i1", 0.0).is_active());
        assert!(!FixedUnitPrice::new("p3", "i1", -5.0).is_active());
    }

    #[test]
    fn test_pricing_mode_serializes_snake_case() {
        let json = serde_json::to_string(&PricingMode::FixedPrice).unwrap();
        assert_eq!(json, "\"fixed_price\"");
        assert_eq!(PricingMode::default(), PricingMode::WeightBased);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = PricingSnapshot {
            suppliers: vec![Supplier::new("s1", "Acindar", 2500.0)],
            ..Default::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["suppliers"][0]["pricePerKg"], 2500.0);
        assert_eq!(json["config"]["marginPct"], 90.0);
        assert!(json["fixedPrices"].as_array().unwrap().is_empty());
    }
}
