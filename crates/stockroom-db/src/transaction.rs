//! # Scoped Transactions
//!
//! Every multi-statement mutation in this crate runs through
//! [`in_transaction`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  in_transaction(pool, |conn| ...)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ──► closure(conn) ──┬── Ok(v)  ──► COMMIT   ──► Ok(v)            │
//! │                            │                                            │
//! │                            └── Err(e) ──► ROLLBACK ──► Err(e)           │
//! │                                                                         │
//! │  Future dropped mid-way (client hung up, timeout):                     │
//! │      the Transaction guard is dropped ──► ROLLBACK                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! SQLite transactions start deferred. Closures must issue a write as their
//! first statement so the write lock is taken (waiting on `busy_timeout`)
//! before anything is read; a read-then-upgrade can fail with
//! `SQLITE_BUSY_SNAPSHOT` under concurrent writers.

use futures_util::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::DbError;

/// Why a transaction closure bailed out.
///
/// `Refused` carries a business outcome (unknown product, insufficient
/// stock, ...) that must roll back but is not a storage failure.
#[derive(Debug)]
pub(crate) enum Abort<T> {
    Storage(DbError),
    Refused(T),
}

impl<T> From<DbError> for Abort<T> {
    fn from(err: DbError) -> Self {
        Abort::Storage(err)
    }
}

impl<T> From<sqlx::Error> for Abort<T> {
    fn from(err: sqlx::Error) -> Self {
        Abort::Storage(err.into())
    }
}

/// Collapses a transaction result: refusals become ordinary values.
pub(crate) fn settle<T>(result: Result<T, Abort<T>>) -> Result<T, DbError> {
    match result {
        Ok(value) | Err(Abort::Refused(value)) => Ok(value),
        Err(Abort::Storage(err)) => Err(err),
    }
}

/// Runs `f` inside one transaction: commit on `Ok`, rollback on `Err`.
///
/// The closure must own what it captures; it receives the connection for the
/// lifetime of the transaction only.
///
/// ## Example
/// ```rust,ignore
/// let id = in_transaction(&pool, |conn| {
///     Box::pin(async move {
///         sqlx::query("UPDATE stocks SET ...").execute(&mut *conn).await?;
///         Ok::<_, DbError>(42)
///     })
/// })
/// .await?;
/// ```
pub async fn in_transaction<T, E, F>(pool: &SqlitePool, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>> + Send,
    T: Send,
    E: From<DbError> + Send,
{
    let mut tx = pool.begin().await.map_err(DbError::from)?;

    match f(&mut *tx).await {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                // The connection is discarded by the pool; nothing was committed.
                warn!(error = %rollback_err, "Rollback failed");
            }
            debug!("Transaction rolled back");
            Err(err)
        }
    }
}
