//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! ## Key Operations
//! - Listing in name order
//! - Price per kg updates (a supplier is otherwise immutable)
//! - Deletion, which cascades to the supplier's recorded weights

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use estribo_core::validation::{validate_price_per_kg, validate_supplier_name};
use estribo_core::Supplier;

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Input for creating a supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub name: String,
    pub price_per_kg: f64,
}

impl NewSupplier {
    pub fn new(name: impl Into<String>, price_per_kg: f64) -> Self {
        NewSupplier {
            name: name.into(),
            price_per_kg,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: String,
    name: String,
    price_per_kg: f64,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier::new(row.id, row.name, row.price_per_kg)
    }
}

/// Reads every supplier on an existing connection or transaction.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> DbResult<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, SupplierRow>(
        r#"
        SELECT id, name, price_per_kg
        FROM suppliers
        ORDER BY name, id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Supplier::from).collect())
}

/// Repository for supplier database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.suppliers();
///
/// let acindar = repo.insert(&NewSupplier::new("Acindar", 2500.0)).await?;
/// repo.update_price(&acindar.id, 2600.0).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let mut conn = self.pool.acquire().await?;
        let suppliers = fetch_all(&mut conn).await?;

        debug!(count = suppliers.len(), "Listed suppliers");
        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Supplier))` - Supplier found
    /// * `Ok(None)` - Supplier not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, price_per_kg
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Supplier::from))
    }

    /// Inserts a new supplier with a freshly generated ID.
    ///
    /// ## Returns
    /// * `Ok(Supplier)` - The stored supplier
    /// * `Err(DbError::Validation)` - Empty name or non-positive price
    pub async fn insert(&self, new: &NewSupplier) -> DbResult<Supplier> {
        validate_supplier_name(&new.name)?;
        validate_price_per_kg(new.price_per_kg)?;

        let supplier = Supplier::new(generate_id(), new.name.trim(), new.price_per_kg);
        let now = Utc::now();

        debug!(name = %supplier.name, price_per_kg = supplier.price_per_kg, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, name, price_per_kg, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(supplier.price_per_kg)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Changes a supplier's price per kilogram.
    ///
    /// Every calculation that uses this supplier picks the new price up on
    /// the next snapshot.
    ///
    /// ## Returns
    /// * `Ok(Supplier)` - The supplier with its new price
    /// * `Err(DbError::NotFound)` - The supplier doesn't exist
    pub async fn update_price(&self, id: &str, price_per_kg: f64) -> DbResult<Supplier> {
        validate_price_per_kg(price_per_kg)?;

        debug!(id = %id, price_per_kg, "Updating supplier price");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET price_per_kg = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_per_kg)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, price_per_kg FROM suppliers WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Deletes a supplier together with every weight recorded for it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }

    /// Counts suppliers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
