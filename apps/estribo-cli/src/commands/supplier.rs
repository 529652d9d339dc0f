//! # Supplier Commands

use std::io::Write;

use estribo_core::validation::validate_id;
use estribo_db::NewSupplier;
use tracing::info;

use super::{write_json, Context};
use crate::cli::SupplierCommand;
use crate::error::CliResult;

pub async fn run(ctx: Context<'_>, action: SupplierCommand, out: &mut dyn Write) -> CliResult<()> {
    let repo = ctx.db.suppliers();

    match action {
        SupplierCommand::Add { name, price_per_kg } => {
            let supplier = repo.insert(&NewSupplier::new(name, price_per_kg)).await?;
            info!(id = %supplier.id, name = %supplier.name, "Supplier added");

            if ctx.json {
                return write_json(out, &supplier);
            }
            writeln!(
                out,
                "Added supplier {} ({}) at {}/kg",
                supplier.name,
                supplier.id,
                ctx.config.format_currency(supplier.price_per_kg)
            )?;
        }

        SupplierCommand::List => {
            let suppliers = repo.list().await?;

            if ctx.json {
                return write_json(out, &suppliers);
            }
            if suppliers.is_empty() {
                writeln!(out, "No suppliers.")?;
                return Ok(());
            }

            writeln!(out, "{:<36}  {:<24}  {:>14}", "ID", "Name", "Price/kg")?;
            for supplier in &suppliers {
                writeln!(
                    out,
                    "{:<36}  {:<24}  {:>14}",
                    supplier.id,
                    supplier.name,
                    ctx.config.format_currency(supplier.price_per_kg)
                )?;
            }
        }

        SupplierCommand::SetPrice { id, price_per_kg } => {
            validate_id(&id)?;
            let supplier = repo.update_price(&id, price_per_kg).await?;
            info!(id = %id, price_per_kg, "Supplier price updated");

            if ctx.json {
                return write_json(out, &supplier);
            }
            writeln!(
                out,
                "Supplier {} now costs {}/kg",
                supplier.name,
                ctx.config.format_currency(supplier.price_per_kg)
            )?;
        }

        SupplierCommand::Remove { id } => {
            validate_id(&id)?;
            repo.delete(&id).await?;
            info!(id = %id, "Supplier removed");

            if !ctx.json {
                writeln!(out, "Removed supplier {}", id)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run_line, setup};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_and_list() {
        let (db, config) = setup().await;

        let added = run_line(&db, &config, &["supplier", "add", "Acindar", "--price-per-kg", "2500"])
            .await
            .unwrap();
        assert!(added.starts_with("Added supplier Acindar"));
        assert!(added.contains("$2500.00/kg"));

        let listed = run_line(&db, &config, &["supplier", "list"]).await.unwrap();
        assert!(listed.contains("Acindar"));
        assert!(listed.contains("$2500.00"));
    }

    #[tokio::test]
    async fn test_list_json() {
        let (db, config) = setup().await;
        run_line(&db, &config, &["supplier", "add", "Sidersa", "--price-per-kg", "2000"])
            .await
            .unwrap();

        let listed = run_line(&db, &config, &["supplier", "list", "--json"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&listed).unwrap();

        assert_eq!(value[0]["name"], "Sidersa");
        assert_eq!(value[0]["pricePerKg"], 2000.0);
    }

    #[tokio::test]
    async fn test_set_price_and_remove() {
        let (db, config) = setup().await;
        let supplier = db
            .suppliers()
            .insert(&estribo_db::NewSupplier::new("Acindar", 2500.0))
            .await
            .unwrap();

        let updated = run_line(&db, &config, &["supplier", "set-price", supplier.id.as_str(), "2600"])
            .await
            .unwrap();
        assert_eq!(updated.trim(), "Supplier Acindar now costs $2600.00/kg");
        let loaded = db.suppliers().get_by_id(&supplier.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_per_kg, 2600.0);

        run_line(&db, &config, &["supplier", "remove", supplier.id.as_str()])
            .await
            .unwrap();
        assert_eq!(db.suppliers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_price_json_returns_supplier() {
        let (db, config) = setup().await;
        let supplier = db
            .suppliers()
            .insert(&estribo_db::NewSupplier::new("Sidersa", 2000.0))
            .await
            .unwrap();

        let output = run_line(
            &db,
            &config,
            &["supplier", "set-price", supplier.id.as_str(), "2100", "--json"],
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["id"], supplier.id.as_str());
        assert_eq!(value["name"], "Sidersa");
        assert_eq!(value["pricePerKg"], 2100.0);
    }

    #[tokio::test]
    async fn test_errors() {
        let (db, config) = setup().await;

        let err = run_line(&db, &config, &["supplier", "remove", "not-a-uuid"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = run_line(
            &db,
            &config,
            &["supplier", "remove", "6f1c2f4e-4a55-4f53-9a77-3a1b0c9d2e10"],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = run_line(&db, &config, &["supplier", "add", "Acindar", "--price-per-kg", "0"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
