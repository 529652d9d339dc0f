//! # Comparison Module
//!
//! Cross-supplier analytics over a set of detailed calculations.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  group_by_item        item ──► [supplier: base cost, ex tax, inc tax]   │
//! │                                                                         │
//! │  price_per_kg_spread  cheapest vs costliest supplier by price per kg    │
//! │                                                                         │
//! │  average_cost_spread  cheapest vs costliest supplier by average         │
//! │                       base cost per item                                │
//! │                                                                         │
//! │  difference_pct = (max − min) / max × 100                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ties
//! Extremes are found with strict comparisons in a left fold, so when
//! several suppliers share the extreme value the first one encountered in
//! input order wins. There is no canonical tie-break beyond that.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::DetailedCalculation;

// =============================================================================
// Types
// =============================================================================

/// One supplier's figures for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierQuote {
    pub supplier_id: String,
    pub supplier_name: String,
    pub base_cost: f64,
    pub price_ex_tax: f64,
    pub price_inc_tax: f64,
}

/// All supplier quotes for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemComparison {
    pub item_id: String,
    pub size_label: String,
    pub quotes: Vec<SupplierQuote>,
}

impl ItemComparison {
    /// The quote with the lowest base cost (first one on ties).
    pub fn cheapest(&self) -> Option<&SupplierQuote> {
        self.quotes
            .iter()
            .reduce(|min, q| if q.base_cost < min.base_cost { q } else { min })
    }
}

/// A supplier paired with the figure it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RankedSupplier {
    pub supplier_id: String,
    pub supplier_name: String,
    pub value: f64,
}

/// Cheapest and costliest supplier and how far apart they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SupplierSpread {
    pub cheapest: RankedSupplier,
    pub costliest: RankedSupplier,

    /// `(max − min) / max × 100`; zero when the maximum is zero.
    pub difference_pct: f64,
}

// =============================================================================
// Grouping
// =============================================================================

/// Groups calculations by item, preserving first-seen item order.
pub fn group_by_item(calcs: &[DetailedCalculation]) -> Vec<ItemComparison> {
    let mut groups: Vec<ItemComparison> = Vec::new();

    for calc in calcs {
        let quote = SupplierQuote {
            supplier_id: calc.supplier_id.clone(),
            supplier_name: calc.supplier_name.clone(),
            base_cost: calc.base_cost,
            price_ex_tax: calc.price_ex_tax,
            price_inc_tax: calc.price_inc_tax,
        };

        match groups.iter_mut().find(|g| g.item_id == calc.item_id) {
            Some(group) => group.quotes.push(quote),
            None => groups.push(ItemComparison {
                item_id: calc.item_id.clone(),
                size_label: calc.size_label.clone(),
                quotes: vec![quote],
            }),
        }
    }

    groups
}

// =============================================================================
// Spreads
// =============================================================================

/// Compares suppliers by price per kilogram.
///
/// Each supplier counts once (its first occurrence). `None` when there are
/// no calculations.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use estribo_core::{comparison, pricing, Item, SaleConfiguration, Supplier};
///
/// let suppliers = vec![Supplier::new("a", "A", 2000.0), Supplier::new("b", "B", 3000.0)];
/// let items = vec![Item::new("i", "x", BTreeMap::new())];
/// let calcs = pricing::weight_based(&items, &suppliers, &SaleConfiguration::default());
///
/// let spread = comparison::price_per_kg_spread(&calcs).unwrap();
/// assert_eq!(spread.cheapest.supplier_id, "a");
/// assert!((spread.difference_pct - 100.0 / 3.0).abs() < 1e-9);
/// ```
pub fn price_per_kg_spread(calcs: &[DetailedCalculation]) -> Option<SupplierSpread> {
    let mut suppliers: Vec<RankedSupplier> = Vec::new();

    for calc in calcs {
        if !suppliers.iter().any(|s| s.supplier_id == calc.supplier_id) {
            suppliers.push(RankedSupplier {
                supplier_id: calc.supplier_id.clone(),
                supplier_name: calc.supplier_name.clone(),
                value: calc.price_per_kg,
            });
        }
    }

    spread(suppliers)
}

/// Compares suppliers by their average base cost across items.
pub fn average_cost_spread(calcs: &[DetailedCalculation]) -> Option<SupplierSpread> {
    // `value` holds the running total until the division below
    let mut sums: Vec<(RankedSupplier, usize)> = Vec::new();

    for calc in calcs {
        match sums.iter_mut().find(|(s, _)| s.supplier_id == calc.supplier_id) {
            Some((supplier, count)) => {
                supplier.value += calc.base_cost;
                *count += 1;
            }
            None => sums.push((
                RankedSupplier {
                    supplier_id: calc.supplier_id.clone(),
                    supplier_name: calc.supplier_name.clone(),
                    value: calc.base_cost,
                },
                1,
            )),
        }
    }

    let averages = sums
        .into_iter()
        .map(|(mut supplier, count)| {
            supplier.value /= count as f64;
            supplier
        })
        .collect();

    spread(averages)
}

fn spread(candidates: Vec<RankedSupplier>) -> Option<SupplierSpread> {
    let cheapest = candidates
        .iter()
        .reduce(|min, s| if s.value < min.value { s } else { min })?
        .clone();
    let costliest = candidates
        .iter()
        .reduce(|max, s| if s.value > max.value { s } else { max })?
        .clone();

    Some(SupplierSpread {
        difference_pct: difference_pct(cheapest.value, costliest.value),
        cheapest,
        costliest,
    })
}

/// `(max − min) / max × 100`, defined as zero when `max` is zero.
pub fn difference_pct(min: f64, max: f64) -> f64 {
    if max == 0.0 {
        0.0
    } else {
        (max - min) / max * 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
