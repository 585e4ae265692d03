//! # Stock Engine
//!
//! Imports, exports and everything that reads the ledger.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  export_stock(product 7, user 1, qty 4, "order #12")                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate id, quantity (1..=MAX), notes length                          │
//! │       │   └── invalid → CoreError::Validation   (store never called)   │
//! │       ▼                                                                 │
//! │  store.record_export(draft)   ← one transaction                        │
//! │       │                                                                 │
//! │       ├── Applied { movement, balance } → StockReceipt                  │
//! │       ├── Insufficient { available }    → CoreError::InsufficientStock │
//! │       └── ProductMissing                → CoreError::ProductNotFound   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{error, warn};

use stockroom_core::ledger;
use stockroom_core::validation::{
    validate_id, validate_movement_filter, validate_movement_quantity, validate_notes,
};
use stockroom_core::{
    CoreError, DbId, LedgerAudit, MovementDraft, MovementEntry, MovementFilter, MovementType,
    StockBalance, StockReceipt, StockSummaryEntry,
};
use stockroom_db::{LedgerOutcome, LedgerStore};

use crate::error::EngineResult;

/// The stock engine.
///
/// Generic over the store so it can run against SQLite or a test double.
#[derive(Debug, Clone)]
pub struct StockEngine<S> {
    store: S,
}

impl<S: LedgerStore> StockEngine<S> {
    pub fn new(store: S) -> Self {
        StockEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receives `quantity` units of a product.
    ///
    /// ## Errors
    /// - `Validation` - non-positive or oversized quantity, notes too long
    /// - `ProductNotFound` - no such product
    pub async fn import_stock(
        &self,
        product_id: DbId,
        user_id: DbId,
        quantity: i64,
        notes: &str,
    ) -> EngineResult<StockReceipt> {
        check_movement(product_id, quantity, notes)?;

        let draft = MovementDraft::import(product_id, user_id, quantity, notes.trim());
        let outcome = self.store.record_import(draft).await?;
        settle(MovementType::Import, product_id, quantity, outcome)
    }

    /// Issues `quantity` units of a product, never below zero.
    ///
    /// ## Errors
    /// - `Validation` - non-positive or oversized quantity, notes too long
    /// - `ProductNotFound` - no such product, or it has no stock record
    /// - `InsufficientStock` - the balance does not cover `quantity`
    pub async fn export_stock(
        &self,
        product_id: DbId,
        user_id: DbId,
        quantity: i64,
        notes: &str,
    ) -> EngineResult<StockReceipt> {
        check_movement(product_id, quantity, notes)?;

        let draft = MovementDraft::export(product_id, user_id, quantity, notes.trim());
        let outcome = self.store.record_export(draft).await?;
        settle(MovementType::Export, product_id, quantity, outcome)
    }

    /// Current balance of a product.
    pub async fn get_balance(&self, product_id: DbId) -> EngineResult<StockBalance> {
        validate_id("productId", product_id)?;

        self.store
            .balance(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id).into())
    }

    /// Movement history matching `filter`, newest first.
    pub async fn query_movements(&self, filter: &MovementFilter) -> EngineResult<Vec<MovementEntry>> {
        validate_movement_filter(filter)?;
        Ok(self.store.query_movements(filter).await?)
    }

    /// Every product with its balance.
    pub async fn stock_summary(&self) -> EngineResult<Vec<StockSummaryEntry>> {
        Ok(self.store.stock_summary().await?)
    }

    /// Replays a product's history and compares it with the cached balance.
    ///
    /// An inconsistent result is returned (and logged), not raised: callers
    /// decide what to do about drift.
    pub async fn verify_ledger(&self, product_id: DbId) -> EngineResult<LedgerAudit> {
        let balance = self.get_balance(product_id).await?;
        let history = self.store.product_ledger(product_id).await?;

        let audit = ledger::audit(product_id, balance.quantity, &history);
        if !audit.consistent {
            error!(
                product_id,
                balance = audit.balance,
                ledger_sum = audit.ledger_sum,
                movements = audit.movement_count,
                "Ledger inconsistent"
            );
        }
        Ok(audit)
    }
}

fn check_movement(product_id: DbId, quantity: i64, notes: &str) -> EngineResult<()> {
    validate_id("productId", product_id)?;
    validate_movement_quantity(quantity)?;
    validate_notes(notes.trim())?;
    Ok(())
}

fn settle(
    kind: MovementType,
    product_id: DbId,
    requested: i64,
    outcome: LedgerOutcome,
) -> EngineResult<StockReceipt> {
    match outcome {
        LedgerOutcome::Applied { movement, balance } => Ok(StockReceipt { movement, balance }),
        LedgerOutcome::ProductMissing => {
            warn!(product_id, %kind, "Movement refused: product not found");
            Err(CoreError::ProductNotFound(product_id).into())
        }
        LedgerOutcome::Insufficient { available } => {
            warn!(product_id, %kind, available, requested, "Movement refused: insufficient stock");
            Err(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            }
            .into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use stockroom_core::{NewUser, ProductDraft, StockMovement, ValidationError};
    use stockroom_db::{Database, DbConfig, DbResult};

    /// Wraps a real store and counts every call that reaches it.
    #[derive(Clone)]
    struct CountingStore {
        inner: Database,
        calls: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl LedgerStore for CountingStore {
        async fn record_import(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
            self.hit();
            self.inner.record_import(draft).await
        }
        async fn record_export(&self, draft: MovementDraft) -> DbResult<LedgerOutcome> {
            self.hit();
            self.inner.record_export(draft).await
        }
        async fn balance(&self, product_id: DbId) -> DbResult<Option<StockBalance>> {
            self.hit();
            self.inner.balance(product_id).await
        }
        async fn query_movements(&self, filter: &MovementFilter) -> DbResult<Vec<MovementEntry>> {
            self.hit();
            self.inner.query_movements(filter).await
        }
        async fn stock_summary(&self) -> DbResult<Vec<StockSummaryEntry>> {
            self.hit();
            self.inner.stock_summary().await
        }
        async fn product_ledger(&self, product_id: DbId) -> DbResult<Vec<StockMovement>> {
            self.hit();
            self.inner.product_ledger(product_id).await
        }
    }

    async fn setup() -> (StockEngine<CountingStore>, Arc<AtomicUsize>, DbId, DbId) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .create(NewUser {
                username: "clerk".to_string(),
                email: "clerk@example.com".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        let product = db
            .products()
            .create(ProductDraft {
                name: "Widget".to_string(),
                description: String::new(),
                image_url: None,
                sku: "W-1".to_string(),
                category_id: None,
            })
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: db,
            calls: calls.clone(),
        };
        (StockEngine::new(store), calls, product.id, user.id)
    }

    #[tokio::test]
    async fn test_receive_and_issue_scenario() {
        let (engine, _, product_id, user_id) = setup().await;

        let receipt = engine
            .import_stock(product_id, user_id, 10, "delivery")
            .await
            .unwrap();
        assert_eq!(receipt.balance, 10);
        assert_eq!(receipt.movement.movement_type, MovementType::Import);

        let receipt = engine
            .export_stock(product_id, user_id, 4, "order #1")
            .await
            .unwrap();
        assert_eq!(receipt.balance, 6);

        let err = engine
            .export_stock(product_id, user_id, 7, "order #2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock {
                available: 6,
                requested: 7,
                ..
            })
        ));

        assert_eq!(engine.get_balance(product_id).await.unwrap().quantity, 6);

        let history = engine
            .query_movements(&MovementFilter::for_product(product_id))
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].movement_type, MovementType::Export);
        assert_eq!(history[0].username, "clerk");
        assert_eq!(history[1].notes, "delivery");

        let audit = engine.verify_ledger(product_id).await.unwrap();
        assert!(audit.consistent);
        assert_eq!(audit.ledger_sum, 6);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let (engine, calls, product_id, user_id) = setup().await;

        for quantity in [0, -5, stockroom_core::MAX_MOVEMENT_QUANTITY + 1] {
            let err = engine
                .import_stock(product_id, user_id, quantity, "")
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                EngineError::Core(CoreError::Validation(ValidationError::InvalidQuantity { .. }))
            ));
            assert!(engine
                .export_stock(product_id, user_id, quantity, "")
                .await
                .is_err());
        }

        let long_notes = "x".repeat(stockroom_core::MAX_NOTES_LENGTH + 1);
        assert!(engine
            .import_stock(product_id, user_id, 1, &long_notes)
            .await
            .is_err());

        let now = Utc::now();
        let inverted = MovementFilter {
            start_date: Some(now),
            end_date: Some(now - Duration::hours(1)),
            ..MovementFilter::default()
        };
        assert!(engine.query_movements(&inverted).await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (engine, _, _, user_id) = setup().await;

        let err = engine.import_stock(404, user_id, 1, "").await.unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::ProductNotFound(404))));

        let err = engine.export_stock(404, user_id, 1, "").await.unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::ProductNotFound(404))));

        let err = engine.get_balance(404).await.unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::ProductNotFound(404))));
    }

    #[tokio::test]
    async fn test_export_everything_reaches_zero() {
        let (engine, _, product_id, user_id) = setup().await;

        engine.import_stock(product_id, user_id, 3, "").await.unwrap();
        let receipt = engine.export_stock(product_id, user_id, 3, "").await.unwrap();
        assert_eq!(receipt.balance, 0);

        let err = engine.export_stock(product_id, user_id, 1, "").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_query_by_date_window() {
        let (engine, _, product_id, user_id) = setup().await;
        let before = Utc::now() - Duration::seconds(1);

        engine.import_stock(product_id, user_id, 5, "").await.unwrap();

        let window = MovementFilter {
            start_date: Some(before),
            end_date: Some(Utc::now() + Duration::seconds(1)),
            ..MovementFilter::default()
        };
        assert_eq!(engine.query_movements(&window).await.unwrap().len(), 1);

        let past = MovementFilter {
            end_date: Some(before),
            ..MovementFilter::default()
        };
        assert!(engine.query_movements(&past).await.unwrap().is_empty());

        let summary = engine.stock_summary().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_reads_leave_the_ledger_untouched() {
        let (engine, _, product_id, user_id) = setup().await;
        engine.import_stock(product_id, user_id, 8, "delivery").await.unwrap();
        engine.export_stock(product_id, user_id, 3, "order #1").await.unwrap();

        let rows = |entries: Vec<MovementEntry>| {
            entries
                .into_iter()
                .map(|m| (m.id, m.movement_type, m.quantity, m.date, m.notes))
                .collect::<Vec<_>>()
        };
        let filter = MovementFilter::for_product(product_id);

        let first_balance = engine.get_balance(product_id).await.unwrap();
        let first_history = rows(engine.query_movements(&filter).await.unwrap());
        let second_balance = engine.get_balance(product_id).await.unwrap();
        let second_history = rows(engine.query_movements(&filter).await.unwrap());

        assert_eq!(first_balance.quantity, 5);
        assert_eq!(second_balance.quantity, 5);
        assert_eq!(first_balance.updated_at, second_balance.updated_at);
        assert_eq!(first_history.len(), 2);
        assert_eq!(first_history, second_history);
    }

    #[tokio::test]
    async fn test_date_bounds_are_inclusive() {
        let (engine, _, product_id, user_id) = setup().await;
        let pause = || std::thread::sleep(std::time::Duration::from_millis(2));

        engine.import_stock(product_id, user_id, 1, "first").await.unwrap();
        pause();
        let receipt = engine.import_stock(product_id, user_id, 2, "second").await.unwrap();
        pause();
        engine.import_stock(product_id, user_id, 3, "third").await.unwrap();

        let date = receipt.movement.date;
        let exact = MovementFilter {
            start_date: Some(date),
            end_date: Some(date),
            ..MovementFilter::default()
        };
        let found = engine.query_movements(&exact).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, receipt.movement.id);
        assert_eq!(found[0].date, date);
    }
}
