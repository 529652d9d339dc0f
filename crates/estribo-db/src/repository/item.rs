//! # Item Repository
//!
//! Database operations for catalog items and their per-supplier weights.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Item ↔ Weight Mapping                                │
//! │                                                                         │
//! │  items                        item_weights                              │
//! │  ┌──────┬─────────────┐       ┌──────┬──────────┬───────────┐          │
//! │  │ id   │ size_label  │       │ item │ supplier │ weight_kg │          │
//! │  ├──────┼─────────────┤       ├──────┼──────────┼───────────┤          │
//! │  │ i1   │ 4.2mm 10x10 │◄──────│ i1   │ acindar  │ 0.035     │          │
//! │  │      │             │◄──────│ i1   │ sidersa  │ 0.033     │          │
//! │  └──────┴─────────────┘       └──────┴──────────┴───────────┘          │
//! │                                                                         │
//! │  Item.weights = { acindar: 0.035, sidersa: 0.033 }                     │
//! │  (item, supplier) is unique; a missing row reads as weight 0.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use estribo_core::validation::{validate_size_label, validate_weight};
use estribo_core::Item;

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Input for creating an item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub size_label: String,

    /// Weight per unit in kg, keyed by supplier id.
    pub weights: BTreeMap<String, f64>,
}

impl NewItem {
    pub fn new(size_label: impl Into<String>, weights: BTreeMap<String, f64>) -> Self {
        NewItem {
            size_label: size_label.into(),
            weights,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    size_label: String,
}

#[derive(Debug, sqlx::FromRow)]
struct WeightRow {
    item_id: String,
    supplier_id: String,
    weight_kg: f64,
}

/// Reads every item, with weights attached, on an existing connection.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> DbResult<Vec<Item>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        r#"
        SELECT id, size_label
        FROM items
        ORDER BY size_label, id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let weight_rows = sqlx::query_as::<_, WeightRow>(
        r#"
        SELECT item_id, supplier_id, weight_kg
        FROM item_weights
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut weights: HashMap<String, BTreeMap<String, f64>> = HashMap::new();
    for row in weight_rows {
        weights
            .entry(row.item_id)
            .or_default()
            .insert(row.supplier_id, row.weight_kg);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let item_weights = weights.remove(&row.id).unwrap_or_default();
            Item::new(row.id, row.size_label, item_weights)
        })
        .collect())
}

async fn fetch_weights(
    conn: &mut SqliteConnection,
    item_id: &str,
) -> DbResult<BTreeMap<String, f64>> {
    let rows = sqlx::query_as::<_, WeightRow>(
        r#"
        SELECT item_id, supplier_id, weight_kg
        FROM item_weights
        WHERE item_id = ?1
        "#,
    )
    .bind(item_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.supplier_id, row.weight_kg))
        .collect())
}

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let item = repo.insert(&NewItem::new("4.2mm 10x10", weights)).await?;
/// repo.set_weight(&item.id, &supplier.id, 0.036).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists all items ordered by size label, weights attached.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;
        let items = fetch_all(&mut conn).await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by its ID, weights attached.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, ItemRow>("SELECT id, size_label FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let weights = fetch_weights(&mut conn, &row.id).await?;
        Ok(Some(Item::new(row.id, row.size_label, weights)))
    }

    /// Inserts an item and its weights in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored item
    /// * `Err(DbError::Validation)` - Empty label or negative weight
    /// * `Err(DbError::ForeignKeyViolation)` - A weight names an unknown supplier
    ///
    /// Nothing is written when any weight fails.
    pub async fn insert(&self, new: &NewItem) -> DbResult<Item> {
        validate_size_label(&new.size_label)?;
        for weight in new.weights.values() {
            validate_weight(*weight)?;
        }

        let item = Item::new(generate_id(), new.size_label.trim(), new.weights.clone());
        let now = Utc::now();

        debug!(size_label = %item.size_label, weights = item.weights.len(), "Inserting item");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO items (id, size_label, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(&item.id)
        .bind(&item.size_label)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (supplier_id, weight_kg) in &item.weights {
            sqlx::query(
                r#"
                INSERT INTO item_weights (id, item_id, supplier_id, weight_kg, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                "#,
            )
            .bind(generate_id())
            .bind(&item.id)
            .bind(supplier_id)
            .bind(*weight_kg)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(item)
    }

    /// Records (or replaces) an item's weight for one supplier.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The item with all of its weights after the change
    /// * `Err(DbError::NotFound)` - The item or the supplier doesn't exist
    pub async fn set_weight(
        &self,
        item_id: &str,
        supplier_id: &str,
        weight_kg: f64,
    ) -> DbResult<Item> {
        validate_weight(weight_kg)?;

        debug!(item_id = %item_id, supplier_id = %supplier_id, weight_kg, "Setting item weight");

        let mut tx = self.pool.begin().await?;

        let item_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE id = ?1")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;
        if item_exists == 0 {
            return Err(DbError::not_found("Item", item_id));
        }

        let supplier_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE id = ?1")
            .bind(supplier_id)
            .fetch_one(&mut *tx)
            .await?;
        if supplier_exists == 0 {
            return Err(DbError::not_found("Supplier", supplier_id));
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO item_weights (id, item_id, supplier_id, weight_kg, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT (item_id, supplier_id)
            DO UPDATE SET weight_kg = excluded.weight_kg, updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_id())
        .bind(item_id)
        .bind(supplier_id)
        .bind(weight_kg)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items SET updated_at = ?2 WHERE id = ?1
            RETURNING id, size_label
            "#,
        )
        .bind(item_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let weights = fetch_weights(&mut tx, &row.id).await?;

        tx.commit().await?;
        Ok(Item::new(row.id, row.size_label, weights))
    }

    /// Deletes an item with its weights and fixed price.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }
}
