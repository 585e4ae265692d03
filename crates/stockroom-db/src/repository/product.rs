//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Create (product + zero balance in one transaction)
//! - Listing joined with balances and category names
//! - Delete under a [`ProductDeletePolicy`]

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::stock::StockRepository;
use crate::store::DeleteOutcome;
use crate::transaction::{in_transaction, settle, Abort};
use stockroom_core::{DbId, Product, ProductDeletePolicy, ProductDraft, ProductWithStock};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.create(draft).await?;
/// let listing = repo.list_with_stock().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: DbId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, image_url, sku, category_id, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, image_url, sku, category_id, created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists every product with its balance and category name, by name.
    pub async fn list_with_stock(&self) -> DbResult<Vec<ProductWithStock>> {
        let products = sqlx::query_as::<_, ProductWithStock>(
            r#"
            SELECT
                p.id,
                p.name,
                p.description,
                p.image_url,
                p.sku,
                p.category_id,
                c.name AS category_name,
                COALESCE(s.quantity, 0) AS quantity,
                p.created_at,
                p.updated_at
            FROM products p
            LEFT JOIN stocks s ON s.product_id = p.id
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.name, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a product and its zero balance in one transaction.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` - the SKU is taken
    /// - `DbError::ForeignKeyViolation` - `category_id` does not exist
    pub async fn create(&self, draft: ProductDraft) -> DbResult<Product> {
        debug!(sku = %draft.sku, "Inserting product");

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let now = Utc::now();

                let product = sqlx::query_as::<_, Product>(
                    r#"
                    INSERT INTO products
                        (name, description, image_url, sku, category_id, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                    RETURNING id, name, description, image_url, sku, category_id, created_at, updated_at
                    "#,
                )
                .bind(draft.name.trim())
                .bind(draft.description.trim())
                .bind(normalized_image_url(&draft))
                .bind(draft.sku.trim())
                .bind(draft.category_id)
                .bind(now)
                .fetch_one(&mut *conn)
                .await?;

                StockRepository::provision(&mut *conn, product.id, now).await?;

                Ok::<_, DbError>(product)
            })
        })
        .await
    }

    /// Replaces the editable fields of a product.
    ///
    /// Returns `None` when the product does not exist.
    pub async fn update(&self, id: DbId, draft: ProductDraft) -> DbResult<Option<Product>> {
        debug!(id, sku = %draft.sku, "Updating product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?1, description = ?2, image_url = ?3, sku = ?4, category_id = ?5,
                updated_at = ?6
            WHERE id = ?7
            RETURNING id, name, description, image_url, sku, category_id, created_at, updated_at
            "#,
        )
        .bind(draft.name.trim())
        .bind(draft.description.trim())
        .bind(normalized_image_url(&draft))
        .bind(draft.sku.trim())
        .bind(draft.category_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product under `policy`.
    ///
    /// ## Policies
    /// ```text
    /// Cascade        → movements, balance and product deleted together
    /// RetainHistory  → InUse { dependents: movement count } when history exists
    /// ```
    pub async fn delete(&self, id: DbId, policy: ProductDeletePolicy) -> DbResult<DeleteOutcome> {
        debug!(id, ?policy, "Deleting product");

        let result = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // Take the write lock before reading.
                let touched = sqlx::query("UPDATE products SET updated_at = updated_at WHERE id = ?1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                if touched == 0 {
                    return Err(Abort::Refused(DeleteOutcome::NotFound));
                }

                if policy == ProductDeletePolicy::RetainHistory {
                    let movements: i64 = sqlx::query_scalar(
                        "SELECT COUNT(*) FROM stock_movements WHERE product_id = ?1",
                    )
                    .bind(id)
                    .fetch_one(&mut *conn)
                    .await?;
                    if movements > 0 {
                        return Err(Abort::Refused(DeleteOutcome::InUse {
                            dependents: movements,
                        }));
                    }
                }

                sqlx::query("DELETE FROM stock_movements WHERE product_id = ?1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("DELETE FROM stocks WHERE product_id = ?1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("DELETE FROM products WHERE id = ?1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;

                Ok(DeleteOutcome::Deleted)
            })
        })
        .await;

        settle(result)
    }
}

fn normalized_image_url(draft: &ProductDraft) -> Option<String> {
    draft
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
