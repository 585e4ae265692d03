//! # Store Traits
//!
//! The seams between the services and storage.
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │     StockEngine      │     │    CatalogManager    │     apps/api (auth)
//! └──────────┬───────────┘     └──────────┬───────────┘            │
//!            │ LedgerStore                │ CatalogStore           │ UserStore
//!            ▼                            ▼                        ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Database (SQLite, this crate)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every ledger mutation is one transaction: the balance update and the
//! movement append commit together or not at all.

use async_trait::async_trait;
use tracing::info;

use stockroom_core::{
    Category, CategoryDeletePolicy, CategoryDraft, DbId, MovementDraft, MovementEntry,
    MovementFilter, NewUser, Product, ProductDeletePolicy, ProductDraft, ProductWithStock,
    StockBalance, StockMovement, StockSummaryEntry, User,
};

use crate::error::DbResult;
use crate::pool::Database;

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a ledger mutation that reached the store.
///
/// Refusals are values, not errors: nothing was written for them.
#[derive(Debug, Clone)]
pub enum LedgerOutcome {
    /// Balance updated and movement appended.
    Applied {
        movement: StockMovement,
        balance: i64,
    },
    /// No such product (or, for exports, no stock record).
    ProductMissing,
    /// Export larger than the balance at the time of the attempt.
    Insufficient { available: i64 },
}

/// Result of a catalog deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Refused by policy; `dependents` is the number of blocking rows.
    InUse { dependents: i64 },
}

// =============================================================================
// Traits
// =============================================================================

/// Balances and the movement history.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Adds `draft.quantity` to the balance (creating a zero balance first if
    /// the product has none) and appends an import movement.
    async fn record_import(&self, draft: MovementDraft) -> DbResult<LedgerOutcome>;

    /// Subtracts `draft.quantity` if the balance covers it and appends an
    /// export movement.
    async fn record_export(&self, draft: MovementDraft) -> DbResult<LedgerOutcome>;

    async fn balance(&self, product_id: DbId) -> DbResult<Option<StockBalance>>;

    /// Filtered history, newest first.
    async fn query_movements(&self, filter: &MovementFilter) -> DbResult<Vec<MovementEntry>>;

    /// Every product with its balance.
    async fn stock_summary(&self) -> DbResult<Vec<StockSummaryEntry>>;

    /// One product's full history in commit order (oldest first).
    async fn product_ledger(&self, product_id: DbId) -> DbResult<Vec<StockMovement>>;
}

/// Products and categories.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts the product together with its zero balance.
    async fn create_product(&self, draft: ProductDraft) -> DbResult<Product>;
    async fn get_product(&self, id: DbId) -> DbResult<Option<Product>>;
    async fn list_products(&self) -> DbResult<Vec<ProductWithStock>>;
    async fn update_product(&self, id: DbId, draft: ProductDraft) -> DbResult<Option<Product>>;
    async fn delete_product(&self, id: DbId, policy: ProductDeletePolicy)
        -> DbResult<DeleteOutcome>;

    async fn create_category(&self, draft: CategoryDraft) -> DbResult<Category>;
    async fn get_category(&self, id: DbId) -> DbResult<Option<Category>>;
    async fn list_categories(&self) -> DbResult<Vec<Category>>;
    async fn update_category(&self, id: DbId, draft: CategoryDraft)
        -> DbResult<Option<Category>>;
    async fn delete_category(
        &self,
        id: DbId,
        policy: CategoryDeletePolicy,
    ) -> DbResult<DeleteOutcome>;
}

/// Accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> DbResult<User>;
    async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn find_user(&self, id: DbId) -> DbResult<Option<User>>;
    async fn touch_last_login(&self, id: DbId) -> DbResult<()>;
}

// =============================================================================
// SQLite Implementations
// =============================================================================

#[async_trait]
impl LedgerStore for Database {
    async fn record_import(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
        let outcome = self.stock().record_import(draft).await?;
        if let LedgerOutcome::Applied { movement, balance } = &outcome {
            info!(
                product_id = movement.product_id,
                movement_id = movement.id,
                quantity = movement.quantity,
                balance,
                "Import committed"
            );
        }
        Ok(outcome)
    }

    async fn record_export(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
        let outcome = self.stock().record_export(draft).await?;
        if let LedgerOutcome::Applied { movement, balance } = &outcome {
            info!(
                product_id = movement.product_id,
                movement_id = movement.id,
                quantity = movement.quantity,
                balance,
                "Export committed"
            );
        }
        Ok(outcome)
    }

    async fn balance(&self, product_id: DbId) -> DbResult<Option<StockBalance>> {
        self.stock().get(product_id).await
    }

    async fn query_movements(&self, filter: &MovementFilter) -> DbResult<Vec<MovementEntry>> {
        self.movements().query(filter).await
    }

    async fn stock_summary(&self) -> DbResult<Vec<StockSummaryEntry>> {
        self.stock().summary().await
    }

    async fn product_ledger(&self, product_id: DbId) -> DbResult<Vec<StockMovement>> {
        self.movements().for_product(product_id).await
    }
}

#[async_trait]
impl CatalogStore for Database {
    async fn create_product(&self, draft: ProductDraft) -> DbResult<Product> {
        self.products().create(draft).await
    }

    async fn get_product(&self, id: DbId) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn list_products(&self) -> DbResult<Vec<ProductWithStock>> {
        self.products().list_with_stock().await
    }

    async fn update_product(&self, id: DbId, draft: ProductDraft) -> DbResult<Option<Product>> {
        self.products().update(id, draft).await
    }

    async fn delete_product(
        &self,
        id: DbId,
        policy: ProductDeletePolicy,
    ) -> DbResult<DeleteOutcome> {
        self.products().delete(id, policy).await
    }

    async fn create_category(&self, draft: CategoryDraft) -> DbResult<Category> {
        self.categories().create(draft).await
    }

    async fn get_category(&self, id: DbId) -> DbResult<Option<Category>> {
        self.categories().get_by_id(id).await
    }

    async fn list_categories(&self) -> DbResult<Vec<Category>> {
        self.categories().list().await
    }

    async fn update_category(
        &self,
        id: DbId,
        draft: CategoryDraft,
    ) -> DbResult<Option<Category>> {
        self.categories().update(id, draft).await
    }

    async fn delete_category(
        &self,
        id: DbId,
        policy: CategoryDeletePolicy,
    ) -> DbResult<DeleteOutcome> {
        self.categories().delete(id, policy).await
    }
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, user: NewUser) -> DbResult<User> {
        self.users().create(user).await
    }

    async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.users().find_by_username(username).await
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.users().find_by_email(email).await
    }

    async fn find_user(&self, id: DbId) -> DbResult<Option<User>> {
        self.users().find_by_id(id).await
    }

    async fn touch_last_login(&self, id: DbId) -> DbResult<()> {
        self.users().touch_last_login(id).await
    }
}
