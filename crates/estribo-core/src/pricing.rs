//! # Pricing Module
//!
//! Per-unit cost and price derivation for every (item, supplier) pair.
//!
//! ## Two Pricing Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WEIGHT-BASED (derive, then ADD tax)                                    │
//! │                                                                         │
//! │    base_cost        = weight × price_per_kg                             │
//! │    cost_with_margin = base_cost × (1 + margin/100)                      │
//! │    tax_amount       = cost_with_margin × tax/100                        │
//! │    price_ex_tax     = cost_with_margin                                  │
//! │    price_inc_tax    = cost_with_margin + tax_amount                     │
//! │                                                                         │
//! │  FIXED-PRICE (already inclusive, EXTRACT tax)                           │
//! │                                                                         │
//! │    base_cost        = weight × price_per_kg                             │
//! │    price_inc_tax    = fixed unit price                                  │
//! │    tax_amount       = price_inc_tax × tax/(100 + tax)                   │
//! │    price_ex_tax     = price_inc_tax − tax_amount                        │
//! │                                                                         │
//! │  Margin never applies in fixed-price mode.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tax Netting
//! The supplier's base cost is assumed to already include input tax at a
//! fixed 21 % ([`INPUT_TAX_RATE_PCT`]). That credit is netted against the
//! output tax debit. The net figure can be negative.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{FixedUnitPrice, Item, PricingMode, SaleConfiguration, Supplier};
use crate::INPUT_TAX_RATE_PCT;

// =============================================================================
// Detailed Calculation
// =============================================================================

/// Derived cost/price breakdown for one (item, supplier) pair.
///
/// Never persisted; always recomputed from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DetailedCalculation {
    pub item_id: String,
    pub size_label: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub price_per_kg: f64,

    /// Weight per unit for this supplier (0 when not recorded).
    pub weight_kg: f64,

    pub mode: PricingMode,

    /// `weight_kg × price_per_kg`, in both modes.
    pub base_cost: f64,

    /// Base cost with margin applied. `None` in fixed-price mode.
    pub cost_with_margin: Option<f64>,

    pub price_ex_tax: f64,
    pub price_inc_tax: f64,

    /// Output tax per unit (added in weight mode, extracted in fixed mode).
    pub tax_amount: f64,
}

impl DetailedCalculation {
    /// Output tax debit, input tax credit and the net payable per unit.
    pub fn tax_netting(&self) -> TaxNetting {
        TaxNetting::new(self.tax_amount, self.base_cost)
    }
}

// =============================================================================
// Tax Netting
// =============================================================================

/// Output tax debit netted against the input tax credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxNetting {
    /// Tax charged to the buyer.
    pub tax_debit: f64,

    /// Tax assumed already paid inside the supplier's cost.
    pub tax_credit: f64,

    /// `tax_debit − tax_credit`. Negative when the credit exceeds the debit.
    pub tax_payable: f64,
}

impl TaxNetting {
    /// Nets `tax_debit` against the credit embedded in `cost`.
    pub fn new(tax_debit: f64, cost: f64) -> Self {
        let tax_credit = input_tax_credit(cost);
        TaxNetting {
            tax_debit,
            tax_credit,
            tax_payable: tax_debit - tax_credit,
        }
    }
}

/// Input tax contained in a tax-inclusive supplier cost.
///
/// Always extracted at [`INPUT_TAX_RATE_PCT`], whatever the configured
/// output rate is.
///
/// ## Example
/// ```rust
/// use estribo_core::pricing::input_tax_credit;
///
/// let credit = input_tax_credit(121.0);
/// assert!((credit - 21.0).abs() < 1e-9);
/// ```
#[inline]
pub fn input_tax_credit(cost: f64) -> f64 {
    cost * (INPUT_TAX_RATE_PCT / (100.0 + INPUT_TAX_RATE_PCT))
}

// =============================================================================
// Weight-Based Mode
// =============================================================================

/// Computes the weight-based breakdown for every item × every supplier.
///
/// Records come out item-major, in input order. A supplier without a
/// recorded weight for an item yields a zero-cost, zero-price record.
pub fn weight_based(
    items: &[Item],
    suppliers: &[Supplier],
    config: &SaleConfiguration,
) -> Vec<DetailedCalculation> {
    let mut calculations = Vec::with_capacity(items.len() * suppliers.len());

    for item in items {
        for supplier in suppliers {
            calculations.push(weight_based_one(item, supplier, config));
        }
    }

    calculations
}

/// Weight-based breakdown for a single pair.
pub fn weight_based_one(
    item: &Item,
    supplier: &Supplier,
    config: &SaleConfiguration,
) -> DetailedCalculation {
    let weight_kg = item.weight_for(&supplier.id);
    let base_cost = weight_kg * supplier.price_per_kg;
    let cost_with_margin = base_cost * (1.0 + config.margin_pct / 100.0);
    let tax_amount = cost_with_margin * (config.tax_pct / 100.0);

    DetailedCalculation {
        item_id: item.id.clone(),
        size_label: item.size_label.clone(),
        supplier_id: supplier.id.clone(),
        supplier_name: supplier.name.clone(),
        price_per_kg: supplier.price_per_kg,
        weight_kg,
        mode: PricingMode::WeightBased,
        base_cost,
        cost_with_margin: Some(cost_with_margin),
        price_ex_tax: cost_with_margin,
        price_inc_tax: cost_with_margin + tax_amount,
        tax_amount,
    }
}

// =============================================================================
// Fixed-Price Mode
// =============================================================================

/// Returns the fixed price record for an item, if any.
///
/// The first record referencing the item wins. Whether it is usable is a
/// separate question, see [`active_fixed_price`].
pub fn fixed_price_for<'a>(
    fixed_prices: &'a [FixedUnitPrice],
    item_id: &str,
) -> Option<&'a FixedUnitPrice> {
    fixed_prices.iter().find(|p| p.item_id == item_id)
}

/// Returns the item's fixed unit price when it is strictly positive.
pub fn active_fixed_price(fixed_prices: &[FixedUnitPrice], item_id: &str) -> Option<f64> {
    fixed_price_for(fixed_prices, item_id)
        .filter(|p| p.is_active())
        .map(|p| p.unit_price)
}

/// Computes the fixed-price breakdown for every eligible item × every
/// supplier.
///
/// Items without a strictly positive fixed price are left out.
pub fn fixed_price(
    items: &[Item],
    suppliers: &[Supplier],
    config: &SaleConfiguration,
    fixed_prices: &[FixedUnitPrice],
) -> Vec<DetailedCalculation> {
    let mut calculations = Vec::new();

    for item in items {
        let Some(unit_price) = active_fixed_price(fixed_prices, &item.id) else {
            continue;
        };

        for supplier in suppliers {
            calculations.push(fixed_price_one(item, supplier, config, unit_price));
        }
    }

    calculations
}

/// Fixed-price breakdown for a single pair at the given unit price.
pub fn fixed_price_one(
    item: &Item,
    supplier: &Supplier,
    config: &SaleConfiguration,
    unit_price: f64,
) -> DetailedCalculation {
    let weight_kg = item.weight_for(&supplier.id);
    let base_cost = weight_kg * supplier.price_per_kg;
    let tax_amount = unit_price * (config.tax_pct / (100.0 + config.tax_pct));

    DetailedCalculation {
        item_id: item.id.clone(),
        size_label: item.size_label.clone(),
        supplier_id: supplier.id.clone(),
        supplier_name: supplier.name.clone(),
        price_per_kg: supplier.price_per_kg,
        weight_kg,
        mode: PricingMode::FixedPrice,
        base_cost,
        cost_with_margin: None,
        price_ex_tax: unit_price - tax_amount,
        price_inc_tax: unit_price,
        tax_amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
