//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │──►│  StockBalance   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product_id (1:1)│      │
//! │  │  name           │   │  sku (unique)   │   │  quantity >= 0  │       │
//! │  │  description    │   │  category_id?   │   │  updated_at     │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ 1:N                                   │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │ StockMovement   │──►│      User       │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  movement_type  │   │  username       │       │
//! │                        │  quantity > 0   │   │  password_hash  │       │
//! │                        │  date, notes    │   └─────────────────┘       │
//! │                        │  APPEND-ONLY    │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type that crosses the HTTP boundary serializes with camelCase field
//! names (`productId`, `imageUrl`, `createdAt`). Timestamps are UTC and
//! serialize as RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Primary key type for every stored record (SQLite `INTEGER PRIMARY KEY`).
pub type DbId = i64;

// =============================================================================
// Movement Type
// =============================================================================

/// Direction of a stock movement.
///
/// Stored in the database as lowercase text (`'import'` / `'export'`), which
/// the schema enforces with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods received: increases the balance.
    Import,
    /// Goods issued: decreases the balance.
    Export,
}

impl MovementType {
    /// Returns the storage / wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::Import => "import",
            MovementType::Export => "export",
        }
    }

    /// Signed effect of `quantity` units of this movement on a balance.
    #[inline]
    pub const fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementType::Import => quantity,
            MovementType::Export => -quantity,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product grouping.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Product
// =============================================================================

/// A stock-keeping unit.
///
/// A product's balance lives in its [`StockBalance`] row, never here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,

    /// Display name.
    pub name: String,

    pub description: String,

    /// Optional image location shown next to movements and in listings.
    pub image_url: Option<String>,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Owning category; `None` once the category is detached.
    pub category_id: Option<DbId>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub sku: String,
    #[serde(default)]
    pub category_id: Option<DbId>,
}

/// A product joined with its current balance and category name.
///
/// Used by the product listing so clients get stock levels in one call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub sku: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    /// Current balance (0 when no stock row exists yet).
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Stock Balance
// =============================================================================

/// The cached balance of one product.
///
/// ## Invariant
/// `quantity` always equals the signed sum of the product's movements and is
/// never negative.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockBalance {
    pub id: DbId,
    pub product_id: DbId,
    pub quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One row of the stock summary: every product with its balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockSummaryEntry {
    pub product_id: DbId,
    pub product_name: String,
    pub sku: String,
    pub image_url: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub quantity: i64,
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// An immutable record of one import or export.
///
/// Movements are append-only: once written they are never updated, and they
/// are deleted only together with their product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: DbId,
    pub product_id: DbId,
    /// Acting user.
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Always > 0; the direction comes from `movement_type`.
    pub quantity: i64,
    /// Business date of the movement.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub notes: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A committed import or export and the balance it left behind.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockReceipt {
    pub movement: StockMovement,
    pub balance: i64,
}

/// A movement about to be appended.
///
/// Built by the stock engine after validation. The store assigns the id and
/// dates the movement inside the transaction that commits it.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    pub product_id: DbId,
    pub user_id: DbId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub notes: String,
}

impl MovementDraft {
    pub fn import(product_id: DbId, user_id: DbId, quantity: i64, notes: impl Into<String>) -> Self {
        Self::new(MovementType::Import, product_id, user_id, quantity, notes)
    }

    pub fn export(product_id: DbId, user_id: DbId, quantity: i64, notes: impl Into<String>) -> Self {
        Self::new(MovementType::Export, product_id, user_id, quantity, notes)
    }

    fn new(
        movement_type: MovementType,
        product_id: DbId,
        user_id: DbId,
        quantity: i64,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            user_id,
            movement_type,
            quantity,
            notes: notes.into(),
        }
    }
}

/// A movement joined with the product and user it references.
///
/// This is what movement queries return: enough to render a history line
/// without further lookups.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementEntry {
    pub id: DbId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub notes: String,
    pub product_id: DbId,
    pub product_name: String,
    pub product_sku: String,
    pub product_image_url: Option<String>,
    pub category_id: Option<DbId>,
    pub user_id: DbId,
    pub username: String,
}

/// Filter for movement queries. Every field is optional; absent fields do
/// not constrain the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    /// Inclusive lower bound on `date`.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub product_id: Option<DbId>,
    #[serde(default)]
    pub category_id: Option<DbId>,
}

impl MovementFilter {
    /// Filter that matches every movement of one product.
    pub fn for_product(product_id: DbId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }
}

/// Result of replaying a product's movement history against its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAudit {
    pub product_id: DbId,
    /// The cached balance.
    pub balance: i64,
    /// Signed sum of every movement.
    pub ledger_sum: i64,
    pub movement_count: usize,
    /// `balance == ledger_sum` and no prefix of the history went negative.
    pub consistent: bool,
}

// =============================================================================
// Users
// =============================================================================

/// A registered user, including the password hash.
///
/// Never serialize this to a client; use [`UserProfile`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[ts(as = "Option<String>")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Input for storing a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
