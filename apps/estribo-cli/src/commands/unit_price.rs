//! # Unit Price Commands

use std::collections::HashMap;
use std::io::Write;

use estribo_core::validation::validate_id;
use tracing::info;

use super::{write_json, Context};
use crate::cli::UnitPriceCommand;
use crate::error::CliResult;

pub async fn run(ctx: Context<'_>, action: UnitPriceCommand, out: &mut dyn Write) -> CliResult<()> {
    let repo = ctx.db.unit_prices();

    match action {
        UnitPriceCommand::Set { item_id, price } => {
            validate_id(&item_id)?;
            let record = repo.set_price(&item_id, price).await?;
            info!(item_id = %item_id, unit_price = price, "Fixed unit price set");

            if ctx.json {
                return write_json(out, &record);
            }
            if record.is_active() {
                writeln!(
                    out,
                    "Item {} sells at {} (tax included)",
                    item_id,
                    ctx.config.format_currency(record.unit_price)
                )?;
            } else {
                writeln!(out, "Item {} has no fixed price", item_id)?;
            }
        }

        UnitPriceCommand::List => {
            let prices = repo.list().await?;

            if ctx.json {
                return write_json(out, &prices);
            }
            if prices.is_empty() {
                writeln!(out, "No fixed prices.")?;
                return Ok(());
            }

            let labels: HashMap<String, String> = ctx
                .db
                .items()
                .list()
                .await?
                .into_iter()
                .map(|i| (i.id, i.size_label))
                .collect();

            writeln!(out, "{:<24}  {:>14}  {}", "Item", "Unit price", "Status")?;
            for price in &prices {
                let label = labels.get(&price.item_id).map_or(price.item_id.as_str(), String::as_str);
                writeln!(
                    out,
                    "{:<24}  {:>14}  {}",
                    label,
                    ctx.config.format_currency(price.unit_price),
                    if price.is_active() { "active" } else { "inactive" }
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run_line, setup};
    use crate::error::ErrorCode;
    use estribo_db::NewItem;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_set_and_list() {
        let (db, config) = setup().await;
        let item = db
            .items()
            .insert(&NewItem::new("4.2mm 10x10", BTreeMap::new()))
            .await
            .unwrap();

        let set = run_line(&db, &config, &["unit-price", "set", item.id.as_str(), "300"])
            .await
            .unwrap();
        assert!(set.contains("$300.00"));

        let listed = run_line(&db, &config, &["unit-price", "list"]).await.unwrap();
        assert!(listed.contains("4.2mm 10x10"));
        assert!(listed.contains("active"));
    }

    #[tokio::test]
    async fn test_zero_clears() {
        let (db, config) = setup().await;
        let item = db
            .items()
            .insert(&NewItem::new("4.2mm 10x10", BTreeMap::new()))
            .await
            .unwrap();

        let set = run_line(&db, &config, &["unit-price", "set", item.id.as_str(), "0"])
            .await
            .unwrap();
        assert!(set.contains("has no fixed price"));

        let listed = run_line(&db, &config, &["unit-price", "list"]).await.unwrap();
        assert!(listed.contains("inactive"));
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let (db, config) = setup().await;

        let err = run_line(
            &db,
            &config,
            &["unit-price", "set", "6f1c2f4e-4a55-4f53-9a77-3a1b0c9d2e10", "300"],
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
