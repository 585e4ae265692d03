//! # Ledger Arithmetic
//!
//! Pure balance arithmetic shared by the store and the engine.
//!
//! ## The Rule
//! ```text
//! balance(p) = Σ quantity(import of p) − Σ quantity(export of p)
//!
//! and for every prefix of p's history (in commit order): balance ≥ 0
//! ```
//!
//! The store keeps the cached balance in step with the history inside one
//! transaction; [`audit`] replays the history afterwards to prove it.

use crate::error::{CoreError, CoreResult};
use crate::types::{DbId, LedgerAudit, MovementType, StockMovement};

/// Anything that can be replayed onto a balance.
pub trait LedgerEntry {
    fn movement_type(&self) -> MovementType;
    fn quantity(&self) -> i64;
}

impl LedgerEntry for StockMovement {
    fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

impl LedgerEntry for (MovementType, i64) {
    fn movement_type(&self) -> MovementType {
        self.0
    }

    fn quantity(&self) -> i64 {
        self.1
    }
}

impl<T: LedgerEntry> LedgerEntry for &T {
    fn movement_type(&self) -> MovementType {
        (**self).movement_type()
    }

    fn quantity(&self) -> i64 {
        (**self).quantity()
    }
}

/// Applies one movement to a balance.
///
/// Returns `None` when the result would be negative or overflow.
#[inline]
pub fn checked_apply(balance: i64, movement_type: MovementType, quantity: i64) -> Option<i64> {
    balance
        .checked_add(movement_type.signed(quantity))
        .filter(|next| *next >= 0)
}

/// Replays a history in commit order, starting from zero.
///
/// ## Errors
/// [`CoreError::LedgerReplay`] at the first movement that would take the
/// balance below zero.
pub fn replay<I>(history: I) -> CoreResult<i64>
where
    I: IntoIterator,
    I::Item: LedgerEntry,
{
    let mut balance = 0_i64;
    for (position, entry) in history.into_iter().enumerate() {
        balance = checked_apply(balance, entry.movement_type(), entry.quantity()).ok_or(
            CoreError::LedgerReplay {
                position,
                balance,
                requested: entry.quantity(),
            },
        )?;
    }
    Ok(balance)
}

/// Signed sum of a history, ignoring prefix order.
pub fn signed_sum<I>(history: I) -> i64
where
    I: IntoIterator,
    I::Item: LedgerEntry,
{
    history
        .into_iter()
        .map(|entry| entry.movement_type().signed(entry.quantity()))
        .sum()
}

/// Compares a cached balance against a product's full history.
///
/// `history` must be in commit order (oldest first).
pub fn audit(product_id: DbId, balance: i64, history: &[StockMovement]) -> LedgerAudit {
    let ledger_sum = signed_sum(history);
    let replayed = replay(history);

    LedgerAudit {
        product_id,
        balance,
        ledger_sum,
        movement_count: history.len(),
        consistent: matches!(replayed, Ok(sum) if sum == balance),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movement(id: DbId, movement_type: MovementType, quantity: i64) -> StockMovement {
        let now = Utc::now();
        StockMovement {
            id,
            product_id: 1,
            user_id: 1,
            movement_type,
            quantity,
            date: now,
            notes: String::new(),
            created_at: now,
        }
    }

    #[test]
    fn test_checked_apply() {
        assert_eq!(checked_apply(0, MovementType::Import, 10), Some(10));
        assert_eq!(checked_apply(10, MovementType::Export, 10), Some(0));
        assert_eq!(checked_apply(10, MovementType::Export, 11), None);
        assert_eq!(checked_apply(i64::MAX, MovementType::Import, 1), None);
    }

    #[test]
    fn test_replay_empty_history_is_zero() {
        let empty: Vec<(MovementType, i64)> = Vec::new();
        assert_eq!(replay(empty).unwrap(), 0);
    }

    #[test]
    fn test_replay_detects_negative_prefix() {
        let history = [
            (MovementType::Import, 5),
            (MovementType::Export, 8),
            (MovementType::Import, 10),
        ];
        // The total is 7, but the second movement overdraws.
        assert_eq!(signed_sum(history), 7);
        assert!(matches!(
            replay(history),
            Err(CoreError::LedgerReplay {
                position: 1,
                balance: 5,
                requested: 8
            })
        ));
    }

    #[test]
    fn test_audit_consistent() {
        let history = vec![
            movement(1, MovementType::Import, 10),
            movement(2, MovementType::Export, 4),
        ];
        let audit = audit(1, 6, &history);
        assert!(audit.consistent);
        assert_eq!(audit.ledger_sum, 6);
        assert_eq!(audit.movement_count, 2);
    }

    #[test]
    fn test_audit_detects_drift() {
        let history = vec![movement(1, MovementType::Import, 10)];
        let audit = audit(1, 9, &history);
        assert!(!audit.consistent);
        assert_eq!(audit.ledger_sum, 10);
        assert_eq!(audit.balance, 9);
    }
}
