//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate is the **heart** of Stockroom. It holds the data model of the
//! stock ledger and every rule that can be checked without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /api/auth ──► /api/stock ──► /api/products ──► /api/categories│  │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                stockroom-engine                                 │   │
//! │  │        StockEngine (import/export)   CatalogManager (CRUD)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  ledger   │  │  policy   │  │ validation│  │   │
//! │  │   │  Product  │  │  replay   │  │  delete   │  │   rules   │  │   │
//! │  │   │  Movement │  │  apply    │  │  rules    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Ledger Store)                     │   │
//! │  │          SQLite queries, migrations, scoped transactions        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, StockBalance, StockMovement, ...)
//! - [`ledger`] - Balance arithmetic and movement-history replay
//! - [`policy`] - Deletion policies for categories and products
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## The Ledger Invariant
//!
//! For every product, the cached balance equals the signed sum of its
//! movements:
//!
//! ```rust
//! use stockroom_core::ledger::replay;
//! use stockroom_core::MovementType;
//!
//! let history = [
//!     (MovementType::Import, 10),
//!     (MovementType::Export, 4),
//! ];
//! assert_eq!(replay(history).unwrap(), 6);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use policy::{CatalogPolicy, CategoryDeletePolicy, ProductDeletePolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity a single import or export may move.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) before they land in the immutable
/// movement history, and keeps every balance far away from `i64` overflow.
pub const MAX_MOVEMENT_QUANTITY: i64 = 1_000_000;

/// Maximum length of the free-text notes attached to a movement.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Issuer written into bearer tokens when none is configured.
pub const DEFAULT_TOKEN_ISSUER: &str = "stock";
