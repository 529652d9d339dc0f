//! # Repository Module
//!
//! Database repository implementations for the pricing store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.suppliers().update_price(id, 2600.0)                       │
//! │       ▼                                                                 │
//! │  SupplierRepository ── validates via estribo-core::validation          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Each repository also exposes a crate-private `fetch_*` function that  │
//! │  runs on a borrowed connection, so `Database::load_snapshot` can call  │
//! │  all of them inside one transaction.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers and their price per kg
//! - [`ItemRepository`](item::ItemRepository) - Catalog items and per-supplier weights
//! - [`ConfigRepository`](config::ConfigRepository) - The single sale configuration
//! - [`UnitPriceRepository`](unit_price::UnitPriceRepository) - Fixed unit prices

pub mod config;
pub mod item;
pub mod supplier;
pub mod unit_price;

/// Helper to generate a new record ID.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};

    /// Fresh, migrated in-memory database.
    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }
}
