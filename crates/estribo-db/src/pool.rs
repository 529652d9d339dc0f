//! # Database Pool Management
//!
//! Connection pool creation, configuration, and snapshot loading.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  CLI startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ├──► db.suppliers() / db.items() / ...   (writes, listings)      │
//! │       │                                                                 │
//! │       └──► db.load_snapshot()                                          │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            BEGIN                                                        │
//! │              suppliers, items + weights, configuration, unit prices    │
//! │            COMMIT                                                       │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            PricingSnapshot (one consistent view for the engine)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so that a report can
//! read a snapshot while another process records a price change.

use estribo_core::PricingSnapshot;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::config::{self, ConfigRepository};
use crate::repository::item::{self, ItemRepository};
use crate::repository::supplier::{self, SupplierRepository};
use crate::repository::unit_price::{self, UnitPriceRepository};

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/estribos.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./estribos.db")).await?;
///
/// let supplier = db.suppliers().insert(&NewSupplier::new("Acindar", 2500.0)).await?;
/// let snapshot = db.load_snapshot().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled (weights and unit prices cascade)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called automatically by `new()` unless disabled in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the supplier repository.
    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    /// Returns the item repository.
    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    /// Returns the sale configuration repository.
    pub fn config(&self) -> ConfigRepository {
        ConfigRepository::new(self.pool.clone())
    }

    /// Returns the fixed unit price repository.
    pub fn unit_prices(&self) -> UnitPriceRepository {
        UnitPriceRepository::new(self.pool.clone())
    }

    /// Reads everything the pricing engine needs in a single transaction.
    ///
    /// ## Consistency
    /// All four collections come from the same transaction, so a supplier
    /// deleted between two reads can never leave an item pointing at a
    /// weight for a supplier that is not in the list.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let snapshot = db.load_snapshot().await?;
    /// let records = snapshot.weight_based();
    /// ```
    pub async fn load_snapshot(&self) -> DbResult<PricingSnapshot> {
        let mut tx = self.pool.begin().await?;

        let suppliers = supplier::fetch_all(&mut tx).await?;
        let items = item::fetch_all(&mut tx).await?;
        let config = config::fetch(&mut tx).await?;
        let fixed_prices = unit_price::fetch_all(&mut tx).await?;

        tx.commit().await?;

        debug!(
            suppliers = suppliers.len(),
            items = items.len(),
            fixed_prices = fixed_prices.len(),
            "Loaded pricing snapshot"
        );

        Ok(PricingSnapshot {
            suppliers,
            items,
            config,
            fixed_prices,
        })
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::item::NewItem;
    use crate::repository::supplier::NewSupplier;
    use estribo_core::{PricingMode, SaleConfiguration, SimulationOptions};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[tokio::test]
    async fn test_empty_snapshot_has_seeded_configuration() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let snapshot = db.load_snapshot().await.unwrap();

        assert!(snapshot.suppliers.is_empty());
        assert!(snapshot.items.is_empty());
        assert!(snapshot.fixed_prices.is_empty());
        assert_eq!(snapshot.config, SaleConfiguration::new(90.0, 21.0));
    }

    #[tokio::test]
    async fn test_snapshot_feeds_the_engine() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let acindar = db
            .suppliers()
            .insert(&NewSupplier::new("Acindar", 2500.0))
            .await
            .unwrap();
        let item = db
            .items()
            .insert(&NewItem::new(
                "4.2mm 10x10",
                BTreeMap::from([(acindar.id.clone(), 0.035)]),
            ))
            .await
            .unwrap();
        db.unit_prices().set_price(&item.id, 300.0).await.unwrap();

        let snapshot = db.load_snapshot().await.unwrap();
        assert_eq!(snapshot.suppliers, vec![acindar]);
        assert_eq!(snapshot.items, vec![item]);

        let weight = snapshot.weight_based();
        assert_eq!(weight.len(), 1);
        assert!((weight[0].price_inc_tax - 201.1625).abs() < 1e-9);

        let fixed = snapshot.fixed_price();
        assert_eq!(fixed.len(), 1);
        assert!((fixed[0].price_inc_tax - 300.0).abs() < 1e-9);

        let sims = snapshot.simulate(PricingMode::WeightBased, SimulationOptions::default());
        assert_eq!(sims.len(), 1);
        assert!((sims[0].batches[0].cost_total - 87_500.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}
