//! # Seed Data Generator
//!
//! Populates the database with demo suppliers, stirrup sizes, weights and
//! fixed prices for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p estribo-db --bin seed
//!
//! # Specify database path
//! cargo run -p estribo-db --bin seed -- --db ./data/estribos.db
//! ```
//!
//! ## Generated Data
//! - Three suppliers with different prices per kg
//! - One item per size below, weighed slightly differently by each supplier
//! - A fixed tax-inclusive price for every other item

use std::collections::BTreeMap;
use std::env;

use estribo_db::{Database, DbConfig, NewItem, NewSupplier};

/// Demo suppliers: (name, price per kg).
const SUPPLIERS: &[(&str, f64)] = &[("Acindar", 2500.0), ("Sidersa", 2000.0), ("Gerdau", 2300.0)];

/// Stirrup sizes: (label, reference weight in kg per unit).
const SIZES: &[(&str, f64)] = &[
    ("4.2mm 10x10", 0.035),
    ("4.2mm 10x15", 0.044),
    ("4.2mm 15x15", 0.053),
    ("6mm 10x20", 0.118),
    ("6mm 15x20", 0.139),
    ("8mm 20x20", 0.316),
];

/// Per-supplier weight deviation from the reference weight.
const WEIGHT_FACTORS: &[f64] = &[1.0, 0.95, 1.03];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./estribos_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stirrup Pricing Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./estribos_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stirrup Pricing Seed Data Generator");
    println!("======================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.suppliers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} suppliers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, price_per_kg) in SUPPLIERS {
        let supplier = db.suppliers().insert(&NewSupplier::new(*name, *price_per_kg)).await?;
        println!("  Supplier {:<10} {:>8.2}/kg", supplier.name, supplier.price_per_kg);
        supplier_ids.push(supplier.id);
    }

    let mut fixed = 0;
    for (idx, (label, reference_kg)) in SIZES.iter().enumerate() {
        let weights: BTreeMap<String, f64> = supplier_ids
            .iter()
            .zip(WEIGHT_FACTORS)
            .map(|(id, factor)| (id.clone(), round_grams(reference_kg * factor)))
            .collect();

        let item = db.items().insert(&NewItem::new(*label, weights)).await?;

        if idx % 2 == 0 {
            // Roughly what the weight-based price comes to with the first supplier.
            let unit_price = (reference_kg * SUPPLIERS[0].1 * 1.9 * 1.21 / 10.0).ceil() * 10.0;
            db.unit_prices().set_price(&item.id, unit_price).await?;
            fixed += 1;
        }
    }

    println!();
    println!("✓ Created {} items ({} with a fixed price)", SIZES.len(), fixed);

    let snapshot = db.load_snapshot().await?;
    println!(
        "  Weight-based records: {}, fixed-price records: {}",
        snapshot.weight_based().len(),
        snapshot.fixed_price().len()
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Rounds a weight to whole grams.
fn round_grams(kg: f64) -> f64 {
    (kg * 1000.0).round() / 1000.0
}
