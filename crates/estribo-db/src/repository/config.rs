//! # Sale Configuration Repository
//!
//! The store holds exactly one sale configuration row. It is seeded by the
//! initial migration with a 90 % margin and 21 % tax and is only ever
//! replaced wholesale.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use estribo_core::validation::{validate_margin_pct, validate_tax_pct};
use estribo_core::SaleConfiguration;

use crate::error::DbResult;

/// Primary key of the single configuration row.
pub const CONFIG_ROW_ID: &str = "00000000-0000-0000-0000-000000000001";

#[derive(Debug, sqlx::FromRow)]
struct ConfigRow {
    margin_pct: f64,
    tax_pct: f64,
}

/// Reads the active configuration, falling back to defaults if the row is gone.
pub(crate) async fn fetch(conn: &mut SqliteConnection) -> DbResult<SaleConfiguration> {
    let row = sqlx::query_as::<_, ConfigRow>(
        "SELECT margin_pct, tax_pct FROM sale_configuration WHERE id = ?1",
    )
    .bind(CONFIG_ROW_ID)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(match row {
        Some(row) => SaleConfiguration::new(row.margin_pct, row.tax_pct),
        None => {
            warn!("Sale configuration row missing, using defaults");
            SaleConfiguration::default()
        }
    })
}

/// Repository for the sale configuration.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    pool: SqlitePool,
}

impl ConfigRepository {
    /// Creates a new ConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConfigRepository { pool }
    }

    /// Returns the active configuration.
    pub async fn get(&self) -> DbResult<SaleConfiguration> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn).await
    }

    /// Replaces the configuration.
    ///
    /// Both percentages are validated before anything is written. The row
    /// is recreated if it was removed by hand.
    pub async fn replace(&self, config: &SaleConfiguration) -> DbResult<()> {
        validate_margin_pct(config.margin_pct)?;
        validate_tax_pct(config.tax_pct)?;

        debug!(
            margin_pct = config.margin_pct,
            tax_pct = config.tax_pct,
            "Replacing sale configuration"
        );

        sqlx::query(
            r#"
            INSERT INTO sale_configuration (id, margin_pct, tax_pct, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (id)
            DO UPDATE SET
                margin_pct = excluded.margin_pct,
                tax_pct = excluded.tax_pct,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(CONFIG_ROW_ID)
        .bind(config.margin_pct)
        .bind(config.tax_pct)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::database;

    #[tokio::test]
    async fn test_seeded_defaults() {
        let db = database().await;

        let config = db.config().get().await.unwrap();

        assert_eq!(config, SaleConfiguration::new(90.0, 21.0));
    }

    #[tokio::test]
    async fn test_replace() {
        let db = database().await;

        db.config()
            .replace(&SaleConfiguration::new(50.0, 10.5))
            .await
            .unwrap();

        assert_eq!(
            db.config().get().await.unwrap(),
            SaleConfiguration::new(50.0, 10.5)
        );
    }

    #[tokio::test]
    async fn test_replace_rejects_out_of_range() {
        let db = database().await;

        let err = db
            .config()
            .replace(&SaleConfiguration::new(90.0, 150.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = db
            .config()
            .replace(&SaleConfiguration::new(-1.0, 21.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(db.config().get().await.unwrap(), SaleConfiguration::default());
    }

    #[tokio::test]
    async fn test_missing_row_falls_back_then_recreates() {
        let db = database().await;
        sqlx::query("DELETE FROM sale_configuration")
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(db.config().get().await.unwrap(), SaleConfiguration::default());

        db.config()
            .replace(&SaleConfiguration::new(70.0, 21.0))
            .await
            .unwrap();
        assert_eq!(
            db.config().get().await.unwrap(),
            SaleConfiguration::new(70.0, 21.0)
        );
    }
}
