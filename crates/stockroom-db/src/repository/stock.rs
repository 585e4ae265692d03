//! # Stock Repository
//!
//! Balances and the two ledger transactions.
//!
//! ## Import / Export Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  IMPORT (one transaction)                                               │
//! │    1. INSERT zero balance if the product exists and has none            │
//! │    2. UPDATE stocks SET quantity = quantity + q  RETURNING quantity     │
//! │         no row → ProductMissing (rollback)                              │
//! │    3. INSERT movement                                                   │
//! │    4. COMMIT                                                            │
//! │                                                                         │
//! │  EXPORT (one transaction)                                               │
//! │    1. UPDATE stocks SET quantity = quantity - q                         │
//! │         WHERE product_id = ? AND quantity >= q  RETURNING quantity      │
//! │         no row → SELECT quantity                                        │
//! │                    found   → Insufficient { available } (rollback)      │
//! │                    missing → ProductMissing (rollback)                  │
//! │    2. INSERT movement                                                   │
//! │    3. COMMIT                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The check and the decrement are one statement, so two concurrent exports
//! can never both pass against the same units. The first statement of each
//! transaction is a write, which takes the SQLite write lock up front.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::movement::MovementRepository;
use crate::store::LedgerOutcome;
use crate::transaction::{in_transaction, settle, Abort};
use stockroom_core::{DbId, MovementDraft, StockBalance, StockSummaryEntry};

/// Repository for product balances.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Creates the zero balance of an existing product, if missing.
    ///
    /// Returns `true` when a row was inserted.
    pub(crate) async fn provision(
        conn: &mut SqliteConnection,
        product_id: DbId,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO stocks (product_id, quantity, created_at, updated_at)
            SELECT id, 0, ?1, ?1 FROM products WHERE id = ?2
            ON CONFLICT (product_id) DO NOTHING
            "#,
        )
        .bind(now)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Gets the balance record of a product.
    pub async fn get(&self, product_id: DbId) -> DbResult<Option<StockBalance>> {
        let balance = sqlx::query_as::<_, StockBalance>(
            r#"
            SELECT id, product_id, quantity, created_at, updated_at
            FROM stocks
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    /// Every product with its balance (0 when none recorded), by name.
    pub async fn summary(&self) -> DbResult<Vec<StockSummaryEntry>> {
        let entries = sqlx::query_as::<_, StockSummaryEntry>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                p.sku,
                p.image_url,
                p.category_id,
                c.name AS category_name,
                COALESCE(s.quantity, 0) AS quantity,
                s.updated_at
            FROM products p
            LEFT JOIN stocks s ON s.product_id = p.id
            LEFT JOIN categories c ON c.id = p.category_id
            ORDER BY p.name, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Applies an import: see the module docs for the protocol.
    pub async fn record_import(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
        debug!(
            product_id = draft.product_id,
            quantity = draft.quantity,
            "Recording import"
        );

        let result = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let now = Utc::now();

                Self::provision(&mut *conn, draft.product_id, now).await?;

                let balance: Option<i64> = sqlx::query_scalar(
                    r#"
                    UPDATE stocks
                    SET quantity = quantity + ?1, updated_at = ?2
                    WHERE product_id = ?3
                    RETURNING quantity
                    "#,
                )
                .bind(draft.quantity)
                .bind(now)
                .bind(draft.product_id)
                .fetch_optional(&mut *conn)
                .await?;

                let Some(balance) = balance else {
                    return Err(Abort::Refused(LedgerOutcome::ProductMissing));
                };

                let movement = MovementRepository::append(&mut *conn, &draft).await?;
                Ok(LedgerOutcome::Applied { movement, balance })
            })
        })
        .await;

        settle(result)
    }

    /// Applies an export: see the module docs for the protocol.
    pub async fn record_export(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
        debug!(
            product_id = draft.product_id,
            quantity = draft.quantity,
            "Recording export"
        );

        let result = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let now = Utc::now();

                let balance: Option<i64> = sqlx::query_scalar(
                    r#"
                    UPDATE stocks
                    SET quantity = quantity - ?1, updated_at = ?2
                    WHERE product_id = ?3 AND quantity >= ?1
                    RETURNING quantity
                    "#,
                )
                .bind(draft.quantity)
                .bind(now)
                .bind(draft.product_id)
                .fetch_optional(&mut *conn)
                .await?;

                let Some(balance) = balance else {
                    let available: Option<i64> =
                        sqlx::query_scalar("SELECT quantity FROM stocks WHERE product_id = ?1")
                            .bind(draft.product_id)
                            .fetch_optional(&mut *conn)
                            .await?;

                    return Err(Abort::Refused(match available {
                        Some(available) => LedgerOutcome::Insufficient { available },
                        None => LedgerOutcome::ProductMissing,
                    }));
                };

                let movement = MovementRepository::append(&mut *conn, &draft).await?;
                Ok(LedgerOutcome::Applied { movement, balance })
            })
        })
        .await;

        settle(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
