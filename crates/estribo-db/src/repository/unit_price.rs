//! # Fixed Unit Price Repository
//!
//! At most one fixed price per item (enforced by a unique index). A price of
//! zero is stored but leaves the item out of fixed-price calculations.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use estribo_core::validation::validate_unit_price;
use estribo_core::FixedUnitPrice;

use super::generate_id;
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct UnitPriceRow {
    id: String,
    item_id: String,
    unit_price: f64,
}

impl From<UnitPriceRow> for FixedUnitPrice {
    fn from(row: UnitPriceRow) -> Self {
        FixedUnitPrice::new(row.id, row.item_id, row.unit_price)
    }
}

/// Reads every fixed price on an existing connection or transaction.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> DbResult<Vec<FixedUnitPrice>> {
    let rows = sqlx::query_as::<_, UnitPriceRow>(
        r#"
        SELECT id, item_id, unit_price
        FROM unit_prices
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(FixedUnitPrice::from).collect())
}

/// Repository for fixed unit prices.
#[derive(Debug, Clone)]
pub struct UnitPriceRepository {
    pool: SqlitePool,
}

impl UnitPriceRepository {
    /// Creates a new UnitPriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UnitPriceRepository { pool }
    }

    /// Lists all fixed price records.
    pub async fn list(&self) -> DbResult<Vec<FixedUnitPrice>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all(&mut conn).await
    }

    /// Sets the tax-inclusive fixed price of an item.
    ///
    /// Updates the item's record when there is one, creates it otherwise.
    ///
    /// ## Returns
    /// * `Ok(FixedUnitPrice)` - The stored record
    /// * `Err(DbError::NotFound)` - The item doesn't exist
    /// * `Err(DbError::Validation)` - Negative or non-finite price
    pub async fn set_price(&self, item_id: &str, unit_price: f64) -> DbResult<FixedUnitPrice> {
        validate_unit_price(unit_price)?;

        debug!(item_id = %item_id, unit_price, "Setting fixed unit price");

        let mut tx = self.pool.begin().await?;

        let item_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE id = ?1")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;
        if item_exists == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        sqlx::query(
            r#"
            INSERT INTO unit_prices (id, item_id, unit_price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT (item_id)
            DO UPDATE SET unit_price = excluded.unit_price, updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_id())
        .bind(item_id)
        .bind(unit_price)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, UnitPriceRow>(
            "SELECT id, item_id, unit_price FROM unit_prices WHERE item_id = ?1",
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::item::NewItem;
    use crate::repository::test_support::database;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_set_price_inserts_then_updates_same_record() {
        let db = database().await;
        let item = db
            .items()
            .insert(&NewItem::new("4.2mm 10x10", BTreeMap::new()))
            .await
            .unwrap();

        let first = db.unit_prices().set_price(&item.id, 300.0).await.unwrap();
        let second = db.unit_prices().set_price(&item.id, 320.0).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.unit_price, 320.0);
        assert_eq!(db.unit_prices().list().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_zero_price_is_stored_but_inactive() {
        let db = database().await;
        let item = db
            .items()
            .insert(&NewItem::new("4.2mm 10x10", BTreeMap::new()))
            .await
            .unwrap();

        let stored = db.unit_prices().set_price(&item.id, 0.0).await.unwrap();

        assert!(!stored.is_active());
        assert_eq!(db.unit_prices().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_price_for_unknown_item() {
        let db = database().await;

        let err = db.unit_prices().set_price("missing", 300.0).await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Item"));
        assert!(db.unit_prices().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_price_rejects_negative() {
        let db = database().await;
        let item = db
            .items()
            .insert(&NewItem::new("4.2mm 10x10", BTreeMap::new()))
            .await
            .unwrap();

        let err = db.unit_prices().set_price(&item.id, -5.0).await.unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
    }
}
