//! # Report Commands
//!
//! Read-only views over a pricing snapshot.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.load_snapshot()  ─── one transaction ───►  PricingSnapshot         │
//! │                                                     │                   │
//! │        ┌────────────────────────┬───────────────────┴──────┐           │
//! │        ▼                        ▼                          ▼           │
//! │  report detail            report simulate            report compare    │
//! │  calculations(mode)       simulate(mode, limit)      weight_based()    │
//! │  one row per              batches of 1000 units,     grouped by item,  │
//! │  item × supplier          totals per supplier        supplier spreads  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use estribo_core::comparison::{self, ItemComparison, SupplierSpread};
use estribo_core::simulation::{suppliers_in, totals_for_supplier};
use estribo_core::{
    DetailedCalculation, ItemSimulation, PricingMode, SimulationOptions, SimulationTotals,
    BATCH_UNITS,
};
use serde::Serialize;
use tracing::debug;

use super::{write_json, Context};
use crate::cli::ReportCommand;
use crate::config::{format_pct, AppConfig};
use crate::error::{CliError, CliResult};

pub async fn run(ctx: Context<'_>, report: ReportCommand, out: &mut dyn Write) -> CliResult<()> {
    match report {
        ReportCommand::Detail { mode } => detail(ctx, mode.into(), out).await,
        ReportCommand::Simulate {
            mode,
            supplier,
            limit,
        } => {
            let limit = limit.unwrap_or(ctx.config.simulation_limit);
            simulate(ctx, mode.into(), supplier.as_deref(), limit, out).await
        }
        ReportCommand::Compare => compare(ctx, out).await,
    }
}

// =============================================================================
// Detail
// =============================================================================

async fn detail(ctx: Context<'_>, mode: PricingMode, out: &mut dyn Write) -> CliResult<()> {
    let snapshot = ctx.db.load_snapshot().await?;
    let calcs = snapshot.calculations(mode);

    debug!(?mode, records = calcs.len(), "Detail report computed");

    if ctx.json {
        return write_json(out, &calcs);
    }
    if calcs.is_empty() {
        writeln!(out, "{}", empty_message(mode))?;
        return Ok(());
    }

    let money = |v: f64| ctx.config.format_currency(v);

    writeln!(
        out,
        "{:<16} {:<16} {:>12} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Item", "Supplier", "Price/kg", "Kg", "Cost", "+Margin", "Ex tax", "Tax", "Inc tax"
    )?;
    for calc in &calcs {
        writeln!(
            out,
            "{:<16} {:<16} {:>12} {:>8.3} {:>12} {:>12} {:>12} {:>12} {:>12}",
            calc.size_label,
            calc.supplier_name,
            money(calc.price_per_kg),
            calc.weight_kg,
            money(calc.base_cost),
            calc.cost_with_margin.map_or_else(|| "-".to_string(), money),
            money(calc.price_ex_tax),
            money(calc.tax_amount),
            money(calc.price_inc_tax),
        )?;
    }
    Ok(())
}

fn empty_message(mode: PricingMode) -> &'static str {
    match mode {
        PricingMode::WeightBased => "No records: add suppliers and items first.",
        PricingMode::FixedPrice => "No records: no item has a fixed price above zero.",
    }
}

// =============================================================================
// Simulate
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport {
    mode: PricingMode,
    item_limit: usize,
    batch_units: f64,
    simulations: Vec<ItemSimulation>,
    totals: Vec<SupplierTotals>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SupplierTotals {
    supplier_id: String,
    supplier_name: String,
    #[serde(flatten)]
    totals: SimulationTotals,
    profit_pct: Option<f64>,
}

async fn simulate(
    ctx: Context<'_>,
    mode: PricingMode,
    supplier: Option<&str>,
    item_limit: usize,
    out: &mut dyn Write,
) -> CliResult<()> {
    let snapshot = ctx.db.load_snapshot().await?;
    let simulations = snapshot.simulate(mode, SimulationOptions::with_item_limit(item_limit));

    let available = suppliers_in(&simulations);
    let selected: Vec<(String, String)> = match supplier {
        None => available,
        Some(wanted) => {
            let found = available
                .into_iter()
                .find(|(id, name)| id == wanted || name.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| CliError::not_found("Supplier", wanted))?;
            vec![found]
        }
    };

    let totals: Vec<SupplierTotals> = selected
        .into_iter()
        .map(|(supplier_id, supplier_name)| {
            let totals = totals_for_supplier(&simulations, &supplier_id);
            SupplierTotals {
                supplier_id,
                supplier_name,
                profit_pct: totals.profit_pct(),
                totals,
            }
        })
        .collect();

    debug!(
        ?mode,
        items = simulations.len(),
        suppliers = totals.len(),
        "Simulation computed"
    );

    if ctx.json {
        return write_json(
            out,
            &SimulationReport {
                mode,
                item_limit,
                batch_units: BATCH_UNITS,
                simulations,
                totals,
            },
        );
    }
    if simulations.is_empty() {
        writeln!(out, "{}", empty_message(mode))?;
        return Ok(());
    }

    write_simulations(ctx.config, &simulations, out)?;
    writeln!(out)?;
    write_totals(ctx.config, &totals, out)?;
    Ok(())
}

fn write_simulations(
    config: &AppConfig,
    simulations: &[ItemSimulation],
    out: &mut dyn Write,
) -> CliResult<()> {
    let money = |v: f64| config.format_currency(v);

    for sim in simulations {
        writeln!(out, "{} ({} units)", sim.size_label, BATCH_UNITS)?;
        writeln!(
            out,
            "  {:<16} {:>10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>9}",
            "Supplier", "Total kg", "Cost", "Revenue", "Tax debit", "Tax credit", "Net tax", "Profit", "Profit %"
        )?;
        for batch in &sim.batches {
            writeln!(
                out,
                "  {:<16} {:>10.2} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>9}",
                batch.supplier_name,
                batch.total_weight_kg,
                money(batch.cost_total),
                money(batch.revenue_inc_tax),
                money(batch.tax_debit),
                money(batch.tax_credit),
                money(batch.tax_payable),
                money(batch.profit),
                format_pct(batch.profit_pct()),
            )?;
        }
    }
    Ok(())
}

fn write_totals(config: &AppConfig, totals: &[SupplierTotals], out: &mut dyn Write) -> CliResult<()> {
    let money = |v: f64| config.format_currency(v);

    writeln!(out, "Totals")?;
    for entry in totals {
        let t = &entry.totals;
        writeln!(
            out,
            "  {:<16} cost {}  revenue {}  net tax {}  profit {} ({})",
            entry.supplier_name,
            money(t.cost),
            money(t.revenue),
            money(t.tax_payable),
            money(t.profit),
            format_pct(entry.profit_pct),
        )?;
    }
    Ok(())
}

// =============================================================================
// Compare
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonReport {
    items: Vec<ItemComparison>,
    price_per_kg: Option<SupplierSpread>,
    average_cost: Option<SupplierSpread>,
}

async fn compare(ctx: Context<'_>, out: &mut dyn Write) -> CliResult<()> {
    let snapshot = ctx.db.load_snapshot().await?;
    let calcs = snapshot.weight_based();

    let report = ComparisonReport {
        items: comparison::group_by_item(&calcs),
        price_per_kg: comparison::price_per_kg_spread(&calcs),
        average_cost: comparison::average_cost_spread(&calcs),
    };

    debug!(items = report.items.len(), "Comparison computed");

    if ctx.json {
        return write_json(out, &report);
    }
    if calcs.is_empty() {
        writeln!(out, "{}", empty_message(PricingMode::WeightBased))?;
        return Ok(());
    }

    write_item_comparisons(ctx.config, &report.items, &calcs, out)?;

    writeln!(out)?;
    if let Some(spread) = &report.price_per_kg {
        write_spread(ctx.config, "Price per kg", spread, out)?;
    }
    if let Some(spread) = &report.average_cost {
        write_spread(ctx.config, "Average cost per unit", spread, out)?;
    }
    Ok(())
}

fn write_item_comparisons(
    config: &AppConfig,
    items: &[ItemComparison],
    calcs: &[DetailedCalculation],
    out: &mut dyn Write,
) -> CliResult<()> {
    let money = |v: f64| config.format_currency(v);

    for item in items {
        let cheapest = item.cheapest().map(|q| q.supplier_id.as_str());

        writeln!(out, "{}", item.size_label)?;
        for calc in calcs.iter().filter(|c| c.item_id == item.item_id) {
            let netting = calc.tax_netting();
            writeln!(
                out,
                "  {} {:<16} cost {:>12}  inc tax {:>12}  tax credit {:>12}  net tax {:>12}",
                if Some(calc.supplier_id.as_str()) == cheapest { "*" } else { " " },
                calc.supplier_name,
                money(calc.base_cost),
                money(calc.price_inc_tax),
                money(netting.tax_credit),
                money(netting.tax_payable),
            )?;
        }
    }
    Ok(())
}

fn write_spread(
    config: &AppConfig,
    title: &str,
    spread: &SupplierSpread,
    out: &mut dyn Write,
) -> CliResult<()> {
    writeln!(
        out,
        "{}: cheapest {} ({}), costliest {} ({}), difference {:.2}%",
        title,
        spread.cheapest.supplier_name,
        config.format_currency(spread.cheapest.value),
        spread.costliest.supplier_name,
        config.format_currency(spread.costliest.value),
        spread.difference_pct,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run_line, setup};
    use crate::error::ErrorCode;
    use estribo_db::{Database, NewItem, NewSupplier};
    use std::collections::BTreeMap;

    /// Acindar 2500/kg and Sidersa 2000/kg, one item weighing 0.035 / 0.033 kg.
    async fn seed(db: &Database) -> String {
        let acindar = db
            .suppliers()
            .insert(&NewSupplier::new("Acindar", 2500.0))
            .await
            .unwrap();
        let sidersa = db
            .suppliers()
            .insert(&NewSupplier::new("Sidersa", 2000.0))
            .await
            .unwrap();
        let item = db
            .items()
            .insert(&NewItem::new(
                "4.2mm 10x10",
                BTreeMap::from([(acindar.id, 0.035), (sidersa.id, 0.033)]),
            ))
            .await
            .unwrap();
        item.id
    }

    #[tokio::test]
    async fn test_detail_weight_based() {
        let (db, config) = setup().await;
        seed(&db).await;

        let report = run_line(&db, &config, &["report", "detail"]).await.unwrap();

        assert!(report.contains("Acindar"));
        assert!(report.contains("$87.50"));
        assert!(report.contains("$201.16"));
        assert!(report.contains("Sidersa"));
    }

    #[tokio::test]
    async fn test_detail_fixed_json() {
        let (db, config) = setup().await;
        let item_id = seed(&db).await;
        db.unit_prices().set_price(&item_id, 300.0).await.unwrap();

        let report = run_line(&db, &config, &["report", "detail", "--mode", "fixed", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        let records = value.as_array().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["mode"], "fixed_price");
        assert_eq!(records[0]["priceIncTax"], 300.0);
        assert!(records[0]["costWithMargin"].is_null());
    }

    #[tokio::test]
    async fn test_detail_empty() {
        let (db, config) = setup().await;

        let report = run_line(&db, &config, &["report", "detail", "--mode", "fixed"])
            .await
            .unwrap();

        assert!(report.starts_with("No records"));
    }

    #[tokio::test]
    async fn test_simulate_totals_for_named_supplier() {
        let (db, config) = setup().await;
        seed(&db).await;

        let report = run_line(
            &db,
            &config,
            &["report", "simulate", "--supplier", "acindar", "--json"],
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["itemLimit"], 3);
        assert_eq!(value["simulations"].as_array().unwrap().len(), 1);
        assert_eq!(value["simulations"][0]["batches"].as_array().unwrap().len(), 2);

        let totals = value["totals"].as_array().unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0]["supplierName"], "Acindar");
        assert_eq!(totals[0]["batches"], 1);
        let cost = totals[0]["cost"].as_f64().unwrap();
        assert!((cost - 87_500.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_simulate_table_and_limit() {
        let (db, config) = setup().await;
        seed(&db).await;

        let report = run_line(&db, &config, &["report", "simulate", "--limit", "0"])
            .await
            .unwrap();
        assert!(report.starts_with("No records"));

        let report = run_line(&db, &config, &["report", "simulate"]).await.unwrap();
        assert!(report.contains("4.2mm 10x10 (1000 units)"));
        assert!(report.contains("$87500.00"));
        assert!(report.contains("Totals"));
    }

    #[tokio::test]
    async fn test_simulate_unknown_supplier() {
        let (db, config) = setup().await;
        seed(&db).await;

        let err = run_line(&db, &config, &["report", "simulate", "--supplier", "Gerdau"])
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_compare() {
        let (db, config) = setup().await;
        seed(&db).await;

        let report = run_line(&db, &config, &["report", "compare"]).await.unwrap();

        // Sidersa: 0.033 × 2000 = 66 < Acindar's 87.50
        assert!(report.contains("* Sidersa"));
        assert!(report.contains("Price per kg: cheapest Sidersa ($2000.00), costliest Acindar ($2500.00), difference 20.00%"));
    }

    #[tokio::test]
    async fn test_compare_json_on_empty_store() {
        let (db, config) = setup().await;

        let report = run_line(&db, &config, &["report", "compare", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert!(value["items"].as_array().unwrap().is_empty());
        assert!(value["pricePerKg"].is_null());
        assert!(value["averageCost"].is_null());
    }
}
