//! # Simulation Module
//!
//! Projects the financials of selling a batch of [`BATCH_UNITS`] units of an
//! item from each supplier.
//!
//! ## Batch Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per-unit DetailedCalculation  ──×1000──►  SimulatedBatch               │
//! │                                                                         │
//! │    cost_total       = base_cost × 1000                                  │
//! │    revenue_inc_tax  = price_inc_tax × 1000                              │
//! │    tax_debit        = tax_amount × 1000                                 │
//! │    tax_credit       = cost_total × 21/121                               │
//! │    tax_payable      = tax_debit − tax_credit                            │
//! │    profit           = revenue_inc_tax − cost_total − tax_payable        │
//! │                                                                         │
//! │  Items: first `item_limit` eligible items (default 3)                   │
//! │  Weight mode: every item is eligible                                    │
//! │  Fixed mode:  only items with a fixed price > 0                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Supplier Totals
//! [`totals_for_supplier`] reduces the simulation to one supplier's sums
//! across all simulated items. An empty selection gives zero totals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{self, DetailedCalculation, TaxNetting};
use crate::types::{FixedUnitPrice, Item, SaleConfiguration, Supplier};
use crate::{BATCH_UNITS, DEFAULT_SIMULATION_ITEM_LIMIT};

// =============================================================================
// Options
// =============================================================================

/// Knobs for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SimulationOptions {
    /// Maximum number of eligible items to simulate.
    pub item_limit: usize,
}

impl SimulationOptions {
    pub const fn with_item_limit(item_limit: usize) -> Self {
        SimulationOptions { item_limit }
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions::with_item_limit(DEFAULT_SIMULATION_ITEM_LIMIT)
    }
}

// =============================================================================
// Simulated Batch
// =============================================================================

/// Projected financials for selling one batch of an item from one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SimulatedBatch {
    pub supplier_id: String,
    pub supplier_name: String,

    /// Weight per unit for this supplier.
    pub weight_kg: f64,

    /// Weight of the whole batch.
    pub total_weight_kg: f64,

    pub cost_total: f64,
    pub revenue_ex_tax: f64,
    pub revenue_inc_tax: f64,
    pub tax_debit: f64,
    pub tax_credit: f64,

    /// Net tax owed. May be negative.
    pub tax_payable: f64,

    /// Revenue minus cost minus net tax.
    pub profit: f64,
}

impl SimulatedBatch {
    /// Scales a per-unit calculation up to a full batch.
    pub fn from_calculation(calc: &DetailedCalculation) -> Self {
        let cost_total = calc.base_cost * BATCH_UNITS;
        let revenue_inc_tax = calc.price_inc_tax * BATCH_UNITS;
        let netting = TaxNetting::new(calc.tax_amount * BATCH_UNITS, cost_total);

        SimulatedBatch {
            supplier_id: calc.supplier_id.clone(),
            supplier_name: calc.supplier_name.clone(),
            weight_kg: calc.weight_kg,
            total_weight_kg: calc.weight_kg * BATCH_UNITS,
            cost_total,
            revenue_ex_tax: calc.price_ex_tax * BATCH_UNITS,
            revenue_inc_tax,
            tax_debit: netting.tax_debit,
            tax_credit: netting.tax_credit,
            tax_payable: netting.tax_payable,
            profit: revenue_inc_tax - cost_total - netting.tax_payable,
        }
    }

    /// Profit as a percentage of cost, `None` when the cost is zero.
    pub fn profit_pct(&self) -> Option<f64> {
        profit_pct(self.profit, self.cost_total)
    }
}

/// Batches of every supplier for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemSimulation {
    pub item_id: String,
    pub size_label: String,
    pub batches: Vec<SimulatedBatch>,
}

// =============================================================================
// Simulations
// =============================================================================

/// Weight-based simulation over the first `options.item_limit` items.
///
/// With no suppliers there is nothing to simulate and the result is empty.
pub fn simulate_weight_based(
    items: &[Item],
    suppliers: &[Supplier],
    config: &SaleConfiguration,
    options: SimulationOptions,
) -> Vec<ItemSimulation> {
    if suppliers.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .take(options.item_limit)
        .map(|item| {
            let calcs = suppliers
                .iter()
                .map(|supplier| pricing::weight_based_one(item, supplier, config));
            item_simulation(item, calcs)
        })
        .collect()
}

/// Fixed-price simulation over the first `options.item_limit` items that
/// carry a strictly positive fixed price.
pub fn simulate_fixed_price(
    items: &[Item],
    suppliers: &[Supplier],
    config: &SaleConfiguration,
    fixed_prices: &[FixedUnitPrice],
    options: SimulationOptions,
) -> Vec<ItemSimulation> {
    if suppliers.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter_map(|item| {
            pricing::active_fixed_price(fixed_prices, &item.id).map(|price| (item, price))
        })
        .take(options.item_limit)
        .map(|(item, unit_price)| {
            let calcs = suppliers
                .iter()
                .map(|supplier| pricing::fixed_price_one(item, supplier, config, unit_price));
            item_simulation(item, calcs)
        })
        .collect()
}

fn item_simulation(
    item: &Item,
    calcs: impl Iterator<Item = DetailedCalculation>,
) -> ItemSimulation {
    ItemSimulation {
        item_id: item.id.clone(),
        size_label: item.size_label.clone(),
        batches: calcs.map(|c| SimulatedBatch::from_calculation(&c)).collect(),
    }
}

// =============================================================================
// Supplier Aggregation
// =============================================================================

/// Sums of one supplier's batches across all simulated items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SimulationTotals {
    /// Number of batches that went into the sums.
    pub batches: usize,
    pub cost: f64,
    pub revenue: f64,
    pub tax_debit: f64,
    pub tax_credit: f64,
    pub tax_payable: f64,
    pub profit: f64,
}

impl SimulationTotals {
    fn add(&mut self, batch: &SimulatedBatch) {
        self.batches += 1;
        self.cost += batch.cost_total;
        self.revenue += batch.revenue_inc_tax;
        self.tax_debit += batch.tax_debit;
        self.tax_credit += batch.tax_credit;
        self.tax_payable += batch.tax_payable;
        self.profit += batch.profit;
    }

    /// Profit as a percentage of cost, `None` when the cost is zero.
    pub fn profit_pct(&self) -> Option<f64> {
        profit_pct(self.profit, self.cost)
    }
}

/// Reduces every batch belonging to `supplier_id` into totals.
///
/// ## Example
/// ```rust
/// use estribo_core::simulation::totals_for_supplier;
///
/// let totals = totals_for_supplier(&[], "anyone");
/// assert_eq!(totals.cost, 0.0);
/// assert_eq!(totals.profit_pct(), None);
/// ```
pub fn totals_for_supplier(simulations: &[ItemSimulation], supplier_id: &str) -> SimulationTotals {
    simulations
        .iter()
        .flat_map(|sim| sim.batches.iter())
        .filter(|batch| batch.supplier_id == supplier_id)
        .fold(SimulationTotals::default(), |mut totals, batch| {
            totals.add(batch);
            totals
        })
}

/// Distinct suppliers appearing in a simulation, in first-seen order.
///
/// Returns `(supplier_id, supplier_name)` pairs. The first entry is the
/// natural default selection.
pub fn suppliers_in(simulations: &[ItemSimulation]) -> Vec<(String, String)> {
    let mut seen: Vec<(String, String)> = Vec::new();

    for batch in simulations.iter().flat_map(|sim| sim.batches.iter()) {
        if !seen.iter().any(|(id, _)| *id == batch.supplier_id) {
            seen.push((batch.supplier_id.clone(), batch.supplier_name.clone()));
        }
    }

    seen
}

fn profit_pct(profit: f64, cost: f64) -> Option<f64> {
    if cost == 0.0 {
        None
    } else {
        Some(profit / cost * 100.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FLOAT_TOLERANCE;
    use std::collections::BTreeMap;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < FLOAT_TOLERANCE * 1000.0
    }

    fn catalog() -> (Vec<Item>, Vec<Supplier>) {
        let suppliers = vec![
            Supplier::new("s1", "Acindar", 2500.0),
            Supplier::new("s2", "Sidersa", 2000.0),
        ];
        let items = (1..=5)
            .map(|n| {
                Item::new(
                    format!("i{n}"),
                    format!("size {n}"),
                    BTreeMap::from([
                        ("s1".to_string(), 0.035 * n as f64),
                        ("s2".to_string(), 0.040 * n as f64),
                    ]),
                )
            })
            .collect();
        (items, suppliers)
    }

    #[test]
    fn test_weight_based_batch_figures() {
        let (items, suppliers) = catalog();
        let config = SaleConfiguration::new(90.0, 21.0);

        let sims = simulate_weight_based(&items, &suppliers, &config, SimulationOptions::default());
        let batch = &sims[0].batches[0];

        assert_eq!(batch.supplier_id, "s1");
        assert!(approx(batch.cost_total, 87_500.0));
        assert!(approx(batch.revenue_inc_tax, 201_162.5));
        assert!(approx(batch.revenue_ex_tax, 166_250.0));
        assert!(approx(batch.tax_debit, 34_912.5));
        assert!(approx(batch.tax_credit, 87_500.0 * 21.0 / 121.0));
        assert!(approx(batch.tax_payable, batch.tax_debit - batch.tax_credit));
        assert!(approx(
            batch.profit,
            batch.revenue_inc_tax - batch.cost_total - batch.tax_payable
        ));
        assert!(approx(batch.total_weight_kg, 35.0));
    }

    #[test]
    fn test_default_limit_takes_first_three_items() {
        let (items, suppliers) = catalog();
        let sims = simulate_weight_based(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            SimulationOptions::default(),
        );

        let ids: Vec<&str> = sims.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2", "i3"]);
        assert!(sims.iter().all(|s| s.batches.len() == 2));
    }

    #[test]
    fn test_item_limit_is_overridable() {
        let (items, suppliers) = catalog();
        let config = SaleConfiguration::default();

        let one = simulate_weight_based(&items, &suppliers, &config, SimulationOptions::with_item_limit(1));
        assert_eq!(one.len(), 1);

        let all = simulate_weight_based(&items, &suppliers, &config, SimulationOptions::with_item_limit(50));
        assert_eq!(all.len(), 5);

        let none = simulate_weight_based(&items, &suppliers, &config, SimulationOptions::with_item_limit(0));
        assert!(none.is_empty());
    }

    #[test]
    fn test_fixed_price_selects_eligible_items_before_limit() {
        let (items, suppliers) = catalog();
        let prices = vec![
            FixedUnitPrice::new("p1", "i1", 0.0),
            FixedUnitPrice::new("p2", "i2", 300.0),
            FixedUnitPrice::new("p4", "i4", 450.0),
            FixedUnitPrice::new("p5", "i5", 600.0),
        ];

        let sims = simulate_fixed_price(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            &prices,
            SimulationOptions::with_item_limit(2),
        );

        let ids: Vec<&str> = sims.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(ids, vec!["i2", "i4"]);

        let batch = &sims[0].batches[0];
        assert!(approx(batch.revenue_inc_tax, 300_000.0));
        assert!(approx(batch.tax_debit, 300_000.0 * 21.0 / 121.0));
    }

    #[test]
    fn test_totals_for_supplier() {
        let (items, suppliers) = catalog();
        let sims = simulate_weight_based(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            SimulationOptions::default(),
        );

        let totals = totals_for_supplier(&sims, "s2");
        let expected_cost: f64 = sims.iter().map(|s| s.batches[1].cost_total).sum();
        let expected_profit: f64 = sims.iter().map(|s| s.batches[1].profit).sum();

        assert_eq!(totals.batches, 3);
        assert!(approx(totals.cost, expected_cost));
        assert!(approx(totals.profit, expected_profit));
        assert!(totals.profit_pct().is_some());
    }

    #[test]
    fn test_empty_selection_totals_are_zero() {
        let totals = totals_for_supplier(&[], "s1");
        assert_eq!(totals, SimulationTotals::default());
        assert_eq!(totals.profit_pct(), None);

        let (items, suppliers) = catalog();
        let sims = simulate_weight_based(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            SimulationOptions::default(),
        );
        assert_eq!(totals_for_supplier(&sims, "unknown").batches, 0);
    }

    #[test]
    fn test_zero_cost_batch_has_undefined_profit_pct() {
        let suppliers = vec![Supplier::new("s1", "Acindar", 2500.0)];
        let items = vec![Item::new("i1", "no weights", BTreeMap::new())];
        let prices = vec![FixedUnitPrice::new("p1", "i1", 100.0)];

        let sims = simulate_fixed_price(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            &prices,
            SimulationOptions::default(),
        );
        let batch = &sims[0].batches[0];

        assert_eq!(batch.cost_total, 0.0);
        assert!(batch.profit > 0.0);
        assert_eq!(batch.profit_pct(), None);
    }

    #[test]
    fn test_suppliers_in_first_seen_order() {
        let (items, mut suppliers) = catalog();
        suppliers.reverse();
        let sims = simulate_weight_based(
            &items,
            &suppliers,
            &SaleConfiguration::default(),
            SimulationOptions::default(),
        );

        let ids: Vec<String> = suppliers_in(&sims).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["s2".to_string(), "s1".to_string()]);
        assert!(suppliers_in(&[]).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let config = SaleConfiguration::default();
        let suppliers = vec![Supplier::new("s1", "Acindar", 2500.0)];

        assert!(simulate_weight_based(&[], &suppliers, &config, SimulationOptions::default()).is_empty());
        assert!(simulate_fixed_price(&[], &suppliers, &config, &[], SimulationOptions::default()).is_empty());

        let (items, _) = catalog();
        let prices = vec![FixedUnitPrice::new("p1", "i1", 300.0)];
        assert!(simulate_weight_based(&items, &[], &config, SimulationOptions::default()).is_empty());
        assert!(simulate_fixed_price(&items, &[], &config, &prices, SimulationOptions::default()).is_empty());
    }
}
