//! # Movement Repository
//!
//! The append-only history of imports and exports.
//!
//! Rows are only ever inserted here (inside the stock transactions) and
//! deleted together with their product. A trigger rejects any UPDATE.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{DbId, MovementDraft, MovementEntry, MovementFilter, StockMovement};

/// Repository for movement history.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Appends one movement on an open transaction.
    ///
    /// Callers have already written on `conn`, so the transaction holds the
    /// write lock and the timestamp taken here orders movements the way they
    /// commit.
    pub(crate) async fn append(
        conn: &mut SqliteConnection,
        draft: &MovementDraft,
    ) -> DbResult<StockMovement> {
        let now = Utc::now();
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (product_id, user_id, movement_type, quantity, date, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, product_id, user_id, movement_type, quantity, date, notes, created_at
            "#,
        )
        .bind(draft.product_id)
        .bind(draft.user_id)
        .bind(draft.movement_type)
        .bind(draft.quantity)
        .bind(now)
        .bind(&draft.notes)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(movement)
    }

    /// Returns movements matching `filter`, newest first.
    ///
    /// ## Filters
    /// ```text
    /// startDate   → m.date >= ?
    /// endDate     → m.date <= ?
    /// productId   → m.product_id = ?
    /// categoryId  → p.category_id = ?
    /// ```
    /// Ties on `date` are broken by id, so the order is total.
    pub async fn query(&self, filter: &MovementFilter) -> DbResult<Vec<MovementEntry>> {
        debug!(?filter, "Querying movements");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT
                m.id,
                m.movement_type,
                m.quantity,
                m.date,
                m.notes,
                m.product_id,
                p.name AS product_name,
                p.sku AS product_sku,
                p.image_url AS product_image_url,
                p.category_id,
                m.user_id,
                u.username
            FROM stock_movements m
            INNER JOIN products p ON p.id = m.product_id
            INNER JOIN users u ON u.id = m.user_id
            WHERE 1 = 1
            "#,
        );

        if let Some(start) = filter.start_date {
            builder.push(" AND m.date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            builder.push(" AND m.date <= ").push_bind(end);
        }
        if let Some(product_id) = filter.product_id {
            builder.push(" AND m.product_id = ").push_bind(product_id);
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND p.category_id = ").push_bind(category_id);
        }

        builder.push(" ORDER BY m.date DESC, m.id DESC");

        let entries = builder
            .build_query_as::<MovementEntry>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = entries.len(), "Movement query returned");
        Ok(entries)
    }

    /// One product's history in commit order.
    pub async fn for_product(&self, product_id: DbId) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, user_id, movement_type, quantity, date, notes, created_at
            FROM stock_movements
            WHERE product_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Number of movements recorded for a product.
    pub async fn count_for_product(&self, product_id: DbId) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
