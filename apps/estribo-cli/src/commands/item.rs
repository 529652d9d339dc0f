//! # Item Commands

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use estribo_core::validation::validate_id;
use estribo_db::NewItem;
use tracing::info;

use super::{write_json, Context};
use crate::cli::ItemCommand;
use crate::error::CliResult;

pub async fn run(ctx: Context<'_>, action: ItemCommand, out: &mut dyn Write) -> CliResult<()> {
    let repo = ctx.db.items();

    match action {
        ItemCommand::Add { size_label, weights } => {
            // A repeated supplier keeps the last weight given
            let weights: BTreeMap<String, f64> = weights.into_iter().collect();
            for supplier_id in weights.keys() {
                validate_id(supplier_id)?;
            }

            let item = repo.insert(&NewItem::new(size_label, weights)).await?;
            info!(id = %item.id, size_label = %item.size_label, "Item added");

            if ctx.json {
                return write_json(out, &item);
            }
            writeln!(
                out,
                "Added item {} ({}) with {} weight(s)",
                item.size_label,
                item.id,
                item.weights.len()
            )?;
        }

        ItemCommand::List => {
            let items = repo.list().await?;

            if ctx.json {
                return write_json(out, &items);
            }
            if items.is_empty() {
                writeln!(out, "No items.")?;
                return Ok(());
            }

            let names: HashMap<String, String> = ctx
                .db
                .suppliers()
                .list()
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect();

            for item in &items {
                writeln!(out, "{:<36}  {}", item.id, item.size_label)?;
                for (supplier_id, weight_kg) in &item.weights {
                    let name = names.get(supplier_id).map_or(supplier_id.as_str(), String::as_str);
                    writeln!(out, "{:<36}    {:<24} {:>10.3} kg", "", name, weight_kg)?;
                }
            }
        }

        ItemCommand::SetWeight {
            item_id,
            supplier_id,
            weight_kg,
        } => {
            validate_id(&item_id)?;
            validate_id(&supplier_id)?;
            let item = repo.set_weight(&item_id, &supplier_id, weight_kg).await?;
            info!(item_id = %item_id, supplier_id = %supplier_id, weight_kg, "Item weight set");

            if ctx.json {
                return write_json(out, &item);
            }
            writeln!(
                out,
                "Item {} weighs {:.3} kg from supplier {}",
                item.size_label, weight_kg, supplier_id
            )?;
        }

        ItemCommand::Remove { id } => {
            validate_id(&id)?;
            repo.delete(&id).await?;
            info!(id = %id, "Item removed");

            if !ctx.json {
                writeln!(out, "Removed item {}", id)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run_line, setup};
    use crate::error::ErrorCode;
    use estribo_db::NewSupplier;

    #[tokio::test]
    async fn test_add_with_weights_and_list() {
        let (db, config) = setup().await;
        let acindar = db
            .suppliers()
            .insert(&NewSupplier::new("Acindar", 2500.0))
            .await
            .unwrap();

        let weight = format!("{}=0.035", acindar.id);
        let added = run_line(&db, &config, &["item", "add", "4.2mm 10x10", "--weight", weight.as_str()])
            .await
            .unwrap();
        assert!(added.contains("4.2mm 10x10"));
        assert!(added.contains("1 weight(s)"));

        let listed = run_line(&db, &config, &["item", "list"]).await.unwrap();
        assert!(listed.contains("4.2mm 10x10"));
        assert!(listed.contains("Acindar"));
        assert!(listed.contains("0.035 kg"));
    }

    #[tokio::test]
    async fn test_set_weight_and_remove() {
        let (db, config) = setup().await;
        let acindar = db
            .suppliers()
            .insert(&NewSupplier::new("Acindar", 2500.0))
            .await
            .unwrap();

        let added = run_line(&db, &config, &["item", "add", "6mm 15x15", "--json"])
            .await
            .unwrap();
        let item: estribo_core::Item = serde_json::from_str(&added).unwrap();

        run_line(&db, &config, &["item", "set-weight", item.id.as_str(), acindar.id.as_str(), "0.12"])
            .await
            .unwrap();
        let loaded = db.items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded.weight_for(&acindar.id), 0.12);

        run_line(&db, &config, &["item", "remove", item.id.as_str()]).await.unwrap();
        assert!(db.items().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_weight_twice_json_returns_item() {
        let (db, config) = setup().await;
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
            .insert(&estribo_db::NewItem::new(
                "4.2mm 10x10",
                std::collections::BTreeMap::from([(sidersa.id.clone(), 0.033)]),
            ))
            .await
            .unwrap();

        for weight in ["0.035", "0.036"] {
            let output = run_line(
                &db,
                &config,
                &["item", "set-weight", item.id.as_str(), acindar.id.as_str(), weight, "--json"],
            )
            .await
            .unwrap();
            let stored: estribo_core::Item = serde_json::from_str(&output).unwrap();

            assert_eq!(stored.id, item.id);
            assert_eq!(stored.weight_for(&acindar.id), weight.parse::<f64>().unwrap());
            assert_eq!(stored.weight_for(&sidersa.id), 0.033);
        }
    }

    #[tokio::test]
    async fn test_add_with_unknown_supplier() {
        let (db, config) = setup().await;

        let err = run_line(
            &db,
            &config,
            &["item", "add", "4.2mm 10x10", "--weight", "6f1c2f4e-4a55-4f53-9a77-3a1b0c9d2e10=0.035"],
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(db.items().list().await.unwrap().is_empty());
    }
}
