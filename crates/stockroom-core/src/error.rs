//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  stockroom-engine errors                                               │
//! │  └── EngineError      - CoreError | DbError                            │
//! │                                                                         │
//! │  apps/api errors                                                       │
//! │  └── ApiError         - What HTTP clients see (JSON)                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, quantities, ...)
//! 3. Errors are enum variants, never String
//! 4. Validation never reaches the store: it fails before any mutation

use thiserror::Error;

use crate::types::DbId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule errors.
///
/// These are client errors: they are never retried and they never leave
/// partial state behind, because they are raised either before a transaction
/// starts or from inside one that is then rolled back.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (or has no stock record).
    #[error("Product not found: {0}")]
    ProductNotFound(DbId),

    /// Category cannot be found.
    #[error("Category not found: {0}")]
    CategoryNotFound(DbId),

    /// User cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(DbId),

    /// Export asks for more than the current balance.
    ///
    /// ## User Workflow
    /// ```text
    /// Export (qty: 10)
    ///      │
    ///      ▼
    /// Conditional update: quantity >= 10 ?  (balance = 6)
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 6, requested: 10 }
    ///      │
    ///      ▼
    /// Client shows: "Only 6 in stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: DbId,
        available: i64,
        requested: i64,
    },

    /// Category deletion refused because products still reference it.
    #[error("Category {category_id} is still referenced by {products} product(s)")]
    CategoryInUse { category_id: DbId, products: i64 },

    /// Product deletion refused because its movement history is retained.
    #[error("Product {product_id} has {movements} stock movement(s) and cannot be deleted")]
    ProductHasHistory { product_id: DbId, movements: i64 },

    /// Replaying a movement history drove the balance negative.
    #[error("Ledger replay failed at movement #{position}: balance {balance}, export {requested}")]
    LedgerReplay {
        position: usize,
        balance: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Movement quantity outside `1..=max`.
    #[error("quantity must be between 1 and {max}, got {quantity}")]
    InvalidQuantity { quantity: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, inverted date range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 6,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 6, requested 10"
        );

        let err = CoreError::CategoryInUse {
            category_id: 3,
            products: 2,
        };
        assert_eq!(
            err.to_string(),
            "Category 3 is still referenced by 2 product(s)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::InvalidQuantity {
            quantity: 0,
            max: 1_000_000,
        };
        assert_eq!(
            err.to_string(),
            "quantity must be between 1 and 1000000, got 0"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
