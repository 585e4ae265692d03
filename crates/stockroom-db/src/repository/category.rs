//! # Category Repository
//!
//! Database operations for categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::DeleteOutcome;
use crate::transaction::{in_transaction, settle, Abort};
use stockroom_core::{Category, CategoryDeletePolicy, CategoryDraft, DbId};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn get_by_id(&self, id: DbId) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create(&self, draft: CategoryDraft) -> DbResult<Category> {
        debug!(name = %draft.name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(draft.name.trim())
        .bind(draft.description.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Returns `None` when the category does not exist.
    pub async fn update(&self, id: DbId, draft: CategoryDraft) -> DbResult<Option<Category>> {
        debug!(id, name = %draft.name, "Updating category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = ?1, description = ?2, updated_at = ?3
            WHERE id = ?4
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(draft.name.trim())
        .bind(draft.description.trim())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Deletes a category under `policy`.
    ///
    /// ## Policies
    /// ```text
    /// Detach  → referencing products get category_id = NULL, then delete
    /// Reject  → InUse { dependents: product count } while referenced
    /// ```
    pub async fn delete(&self, id: DbId, policy: CategoryDeletePolicy) -> DbResult<DeleteOutcome> {
        debug!(id, ?policy, "Deleting category");

        let result = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // Take the write lock before reading.
                let touched =
                    sqlx::query("UPDATE categories SET updated_at = updated_at WHERE id = ?1")
                        .bind(id)
                        .execute(&mut *conn)
                        .await?
                        .rows_affected();
                if touched == 0 {
                    return Err(Abort::Refused(DeleteOutcome::NotFound));
                }

                match policy {
                    CategoryDeletePolicy::Reject => {
                        let products: i64 = sqlx::query_scalar(
                            "SELECT COUNT(*) FROM products WHERE category_id = ?1",
                        )
                        .bind(id)
                        .fetch_one(&mut *conn)
                        .await?;
                        if products > 0 {
                            return Err(Abort::Refused(DeleteOutcome::InUse {
                                dependents: products,
                            }));
                        }
                    }
                    CategoryDeletePolicy::Detach => {
                        sqlx::query(
                            "UPDATE products SET category_id = NULL, updated_at = ?1 WHERE category_id = ?2",
                        )
                        .bind(Utc::now())
                        .bind(id)
                        .execute(&mut *conn)
                        .await?;
                    }
                }

                sqlx::query("DELETE FROM categories WHERE id = ?1")
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockroom_core::ProductDraft;

    fn category(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: String::new(),
        }
    }

    async fn product_in(db: &Database, category_id: DbId) -> DbId {
        db.products()
            .create(ProductDraft {
                name: "Cola".to_string(),
                description: String::new(),
                image_url: None,
                sku: "COLA-1".to_string(),
                category_id: Some(category_id),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo.create(category("Drinks")).await.unwrap();
        repo.create(category("Bakery")).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Bakery");

        let updated = repo
            .update(created.id, category("Beverages"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Beverages");
        assert!(repo.update(999, category("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_detaches_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = db.categories().create(category("Drinks")).await.unwrap();
        let product_id = product_in(&db, drinks.id).await;

        let outcome = db
            .categories()
            .delete(drinks.id, CategoryDeletePolicy::Detach)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.category_id, None);
    }

    #[tokio::test]
    async fn test_delete_rejected_while_referenced() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = db.categories().create(category("Drinks")).await.unwrap();
        product_in(&db, drinks.id).await;

        let outcome = db
            .categories()
            .delete(drinks.id, CategoryDeletePolicy::Reject)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::InUse { dependents: 1 });
        assert!(db.categories().get_by_id(drinks.id).await.unwrap().is_some());

        let outcome = db
            .categories()
            .delete(12345, CategoryDeletePolicy::Reject)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }
}
