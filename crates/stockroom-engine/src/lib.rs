//! # stockroom-engine: Stock Engine and Catalog Manager
//!
//! The services behind the HTTP API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apps/api handlers                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────┐     ┌──────────────────────────┐         │
//! │  │ StockEngine<LedgerStore> │     │ CatalogManager<Catalog…> │         │
//! │  │  validate → one store    │     │  validate → store        │         │
//! │  │  call → map the outcome  │     │  → apply delete policy   │         │
//! │  └────────────┬─────────────┘     └────────────┬─────────────┘         │
//! │               └──────────────┬─────────────────┘                        │
//! │                              ▼                                          │
//! │                 stockroom-db (Database: SQLite)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are [`EngineError`]: either a [`stockroom_core::CoreError`] the
//! caller can act on, or a storage failure.

pub mod catalog;
pub mod engine;
pub mod error;

pub use catalog::CatalogManager;
pub use engine::StockEngine;
pub use error::{EngineError, EngineResult};
