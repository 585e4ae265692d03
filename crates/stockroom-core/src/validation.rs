//! # Validation Module
//!
//! Input validation utilities for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Malformed bodies rejected with 400                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine / Catalog (Rust)                                      │
//! │  └── THIS MODULE: Business rule validation, before any store call      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0), CHECK (quantity > 0)                       │
//! │  ├── UNIQUE (sku), UNIQUE (username)                                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_movement_quantity};
//!
//! validate_sku("COKE-330").unwrap();
//! validate_movement_quantity(5).unwrap();
//! assert!(validate_movement_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CategoryDraft, MovementFilter, ProductDraft};
use crate::{MAX_MOVEMENT_QUANTITY, MAX_NOTES_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Movement Validators
// =============================================================================

/// Validates the quantity of an import or export.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed [`MAX_MOVEMENT_QUANTITY`]
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POST /api/stock/export { productId: 7, quantity: 0 }                   │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_movement_quantity(0) ← THIS FUNCTION                          │
/// │       │                                                                 │
/// │       ├── qty < 1 or qty > MAX → InvalidQuantity (nothing written)      │
/// │       │                                                                 │
/// │       └── OK → Proceed to the store transaction                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_movement_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_MOVEMENT_QUANTITY).contains(&quantity) {
        return Err(ValidationError::InvalidQuantity {
            quantity,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }
    Ok(())
}

/// Validates free-text movement notes (may be empty).
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    max_len("notes", notes, MAX_NOTES_LENGTH)
}

/// Validates a movement filter.
///
/// ## Rules
/// - `startDate` must not be after `endDate` when both are given
/// - Id filters, when given, must be positive
pub fn validate_movement_filter(filter: &MovementFilter) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(ValidationError::InvalidFormat {
                field: "startDate".to_string(),
                reason: "must not be after endDate".to_string(),
            });
        }
    }

    if let Some(id) = filter.product_id {
        validate_id("productId", id)?;
    }
    if let Some(id) = filter.category_id {
        validate_id("categoryId", id)?;
    }

    Ok(())
}

/// Validates a record id supplied by a client.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();
    required("sku", sku)?;
    max_len("sku", sku, 50)?;

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name (1..=200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;
    max_len("name", name, 200)
}

/// Validates a category name (1..=100 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;
    max_len("name", name, 100)
}

/// Validates an optional image URL.
///
/// Accepts absolute http(s) URLs and server-relative paths.
pub fn validate_image_url(url: Option<&str>) -> ValidationResult<()> {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(());
    };

    max_len("imageUrl", url, 500)?;

    if !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')) {
        return Err(ValidationError::InvalidFormat {
            field: "imageUrl".to_string(),
            reason: "must be an http(s) URL or an absolute path".to_string(),
        });
    }

    Ok(())
}

/// Validates every field of a product draft.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_sku(&draft.sku)?;
    max_len("description", &draft.description, 2000)?;
    validate_image_url(draft.image_url.as_deref())?;
    if let Some(id) = draft.category_id {
        validate_id("categoryId", id)?;
    }
    Ok(())
}

/// Validates every field of a category draft.
pub fn validate_category_draft(draft: &CategoryDraft) -> ValidationResult<()> {
    validate_category_name(&draft.name)?;
    max_len("description", &draft.description, 2000)
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - 3 to 50 characters
/// - Letters, numbers, `_`, `-`, `.`
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();
    required("username", username)?;

    if username.chars().count() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }
    max_len("username", username, 50)?;

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, '_', '-' and '.'".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address (shape only, no deliverability check).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;
    max_len("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a plaintext password before hashing (8..=128 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }
    max_len("password", password, 128)
}

// =============================================================================
// Unit Tests
// =============================================================================
