//! # Catalog Manager
//!
//! Product and category CRUD with validation and deletion policies.
//!
//! ```text
//! ┌────────────────────┬───────────────────────────────────────────────────┐
//! │ create_product     │ validate → category exists? → insert + zero stock │
//! │ update_product     │ validate → category exists? → update              │
//! │ delete_product     │ Cascade: product, balance, history together       │
//! │                    │ RetainHistory: ProductHasHistory if any movement  │
//! │ delete_category    │ Detach: products keep existing, uncategorized     │
//! │                    │ Reject: CategoryInUse while referenced            │
//! └────────────────────┴───────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use stockroom_core::validation::{validate_category_draft, validate_id, validate_product_draft};
use stockroom_core::{
    CatalogPolicy, Category, CategoryDraft, CoreError, DbId, Product, ProductDraft,
    ProductWithStock, ValidationError,
};
use stockroom_db::{CatalogStore, DbError, DeleteOutcome};

use crate::error::{EngineError, EngineResult};

/// Catalog service.
#[derive(Debug, Clone)]
pub struct CatalogManager<S> {
    store: S,
    policy: CatalogPolicy,
}

impl<S: CatalogStore> CatalogManager<S> {
    pub fn new(store: S, policy: CatalogPolicy) -> Self {
        CatalogManager { store, policy }
    }

    pub fn policy(&self) -> CatalogPolicy {
        self.policy
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product with a zero balance.
    ///
    /// ## Errors
    /// - `Validation` - bad fields, or `Duplicate` when the SKU is taken
    /// - `CategoryNotFound` - `category_id` does not exist
    pub async fn create_product(&self, draft: ProductDraft) -> EngineResult<Product> {
        validate_product_draft(&draft)?;
        self.require_category(draft.category_id).await?;

        let sku = draft.sku.trim().to_string();
        let category_id = draft.category_id;
        let product = self
            .store
            .create_product(draft)
            .await
            .map_err(|e| product_write_error(e, &sku, category_id))?;

        info!(product_id = product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: DbId) -> EngineResult<Product> {
        validate_id("id", id)?;
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Every product with its balance.
    pub async fn list_products(&self) -> EngineResult<Vec<ProductWithStock>> {
        Ok(self.store.list_products().await?)
    }

    pub async fn update_product(&self, id: DbId, draft: ProductDraft) -> EngineResult<Product> {
        validate_id("id", id)?;
        validate_product_draft(&draft)?;
        self.require_category(draft.category_id).await?;

        let sku = draft.sku.trim().to_string();
        let category_id = draft.category_id;
        self.store
            .update_product(id, draft)
            .await
            .map_err(|e| product_write_error(e, &sku, category_id))?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Deletes a product under the configured policy.
    pub async fn delete_product(&self, id: DbId) -> EngineResult<()> {
        validate_id("id", id)?;

        match self.store.delete_product(id, self.policy.product_delete).await? {
            DeleteOutcome::Deleted => {
                info!(product_id = id, policy = ?self.policy.product_delete, "Product deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(CoreError::ProductNotFound(id).into()),
            DeleteOutcome::InUse { dependents } => {
                warn!(product_id = id, movements = dependents, "Product delete refused");
                Err(CoreError::ProductHasHistory {
                    product_id: id,
                    movements: dependents,
                }
                .into())
            }
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn create_category(&self, draft: CategoryDraft) -> EngineResult<Category> {
        validate_category_draft(&draft)?;
        let category = self.store.create_category(draft).await?;
        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn get_category(&self, id: DbId) -> EngineResult<Category> {
        validate_id("id", id)?;
        self.store
            .get_category(id)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(id).into())
    }

    pub async fn list_categories(&self) -> EngineResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn update_category(&self, id: DbId, draft: CategoryDraft) -> EngineResult<Category> {
        validate_id("id", id)?;
        validate_category_draft(&draft)?;
        self.store
            .update_category(id, draft)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(id).into())
    }

    /// Deletes a category under the configured policy.
    pub async fn delete_category(&self, id: DbId) -> EngineResult<()> {
        validate_id("id", id)?;

        match self.store.delete_category(id, self.policy.category_delete).await? {
            DeleteOutcome::Deleted => {
                info!(category_id = id, policy = ?self.policy.category_delete, "Category deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(CoreError::CategoryNotFound(id).into()),
            DeleteOutcome::InUse { dependents } => {
                warn!(category_id = id, products = dependents, "Category delete refused");
                Err(CoreError::CategoryInUse {
                    category_id: id,
                    products: dependents,
                }
                .into())
            }
        }
    }

    async fn require_category(&self, category_id: Option<DbId>) -> EngineResult<()> {
        if let Some(id) = category_id {
            if self.store.get_category(id).await?.is_none() {
                return Err(CoreError::CategoryNotFound(id).into());
            }
        }
        Ok(())
    }
}

/// Maps constraint failures of a product insert/update to client errors.
fn product_write_error(err: DbError, sku: &str, category_id: Option<DbId>) -> EngineError {
    if err.violated_column() == Some("sku") {
        return ValidationError::Duplicate {
            field: "sku".to_string(),
            value: sku.to_string(),
        }
        .into();
    }

    // The category vanished between the check and the write.
    if let (DbError::ForeignKeyViolation { .. }, Some(id)) = (&err, category_id) {
        return CoreError::CategoryNotFound(id).into();
    }

    err.into()
}

// =============================================================================
// Unit Tests
// =============================================================================
