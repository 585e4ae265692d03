//! # Repository Module
//!
//! SQLite repository implementations for the ledger store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (StockEngine, CatalogManager)                                  │
//! │       │                                                                 │
//! │       │  store.record_export(draft)                                    │
//! │       ▼                                                                 │
//! │  Database (store traits)                                               │
//! │       │                                                                 │
//! │       │  db.stock().record_export(draft)                               │
//! │       ▼                                                                 │
//! │  StockRepository ──► in_transaction ──► MovementRepository::append     │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product CRUD, creation provisions a zero balance
//! - [`CategoryRepository`] - Category CRUD with delete policies
//! - [`StockRepository`] - Balances, import/export transactions, summary
//! - [`MovementRepository`] - Append-only history and filtered queries
//! - [`UserRepository`] - Accounts

pub mod category;
pub mod movement;
pub mod product;
pub mod stock;
pub mod user;

pub use category::CategoryRepository;
pub use movement::MovementRepository;
pub use product::ProductRepository;
pub use stock::StockRepository;
pub use user::UserRepository;
