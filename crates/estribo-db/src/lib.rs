//! # estribo-db: Record Store for Stirrup Pricing
//!
//! This crate persists suppliers, items, per-supplier weights, the sale
//! configuration and fixed unit prices, and hands the pricing engine a
//! consistent [`PricingSnapshot`](estribo_core::PricingSnapshot).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stirrup Pricing Data Flow                        │
//! │                                                                         │
//! │  CLI command (report simulate)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     estribo-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │ (supplier.rs)  │    │  (embedded)  │ │   │
//! │  │   │               │    │                │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ SupplierRepo   │    │ 001_initial  │ │   │
//! │  │   │ load_snapshot │    │ ItemRepo       │    │   _schema    │ │   │
//! │  │   │               │    │ ConfigRepo     │    │              │ │   │
//! │  │   │               │    │ UnitPriceRepo  │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingSnapshot ──► estribo-core engine ──► records for display       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and snapshot loading
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estribo_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./estribos.db")).await?;
//! let snapshot = db.load_snapshot().await?;
//! let calcs = snapshot.weight_based();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::config::ConfigRepository;
pub use repository::item::{ItemRepository, NewItem};
pub use repository::supplier::{NewSupplier, SupplierRepository};
pub use repository::unit_price::UnitPriceRepository;
