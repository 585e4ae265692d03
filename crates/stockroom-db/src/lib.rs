//! # stockroom-db: Ledger Store for Stockroom
//!
//! This crate owns every byte Stockroom persists. It uses SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  StockEngine::export_stock (validated)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ StockRepo     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ MovementRepo  │    │ 001_init.sql │  │   │
//! │  │   │ in_transaction│    │ ProductRepo   │    │              │  │   │
//! │  │   │ store traits  │    │ CategoryRepo  │    │              │  │   │
//! │  │   └───────────────┘    │ UserRepo      │    └──────────────┘  │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - A balance update and its movement commit together or not at all
//! - Balances never go negative (conditional update + `CHECK (quantity >= 0)`)
//! - Movements are append-only (trigger on UPDATE)
//! - Dropping an in-flight operation rolls its transaction back
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`transaction`] - Scoped transactions
//! - [`store`] - Store traits and their SQLite implementations
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig, LedgerStore};
//!
//! let db = Database::new(DbConfig::new("stockroom.db")).await?;
//! let balance = db.balance(product_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{CatalogStore, DeleteOutcome, LedgerOutcome, LedgerStore, UserStore};

pub use repository::{
    CategoryRepository, MovementRepository, ProductRepository, StockRepository, UserRepository,
};
