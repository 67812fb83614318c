//! Advisory borrow-limit checking
//!
//! The ledger itself never refuses a borrow over the limit; these checks let a
//! caller preview an action before submitting it.

use crate::{Error, Result};
use rust_decimal::Decimal;
use rwa_ledger_core::{ActionMode, LedgerSnapshot};

/// Limit checker
#[derive(Debug, Default, Clone, Copy)]
pub struct LimitChecker;

impl LimitChecker {
    /// Create new limit checker
    pub fn new() -> Self {
        Self
    }

    /// Borrowing still available before the limit
    pub fn borrow_capacity(&self, snapshot: &LedgerSnapshot) -> Decimal {
        (snapshot.borrow_limit - snapshot.total_borrowed).max(Decimal::ZERO)
    }

    /// Snapshot as it would look after the action
    ///
    /// Rejects amounts the ledger would also reject: non-positive ones and
    /// ones that push a total past `Decimal::MAX`.
    pub fn preview(&self, snapshot: &LedgerSnapshot, mode: ActionMode, amount: Decimal) -> Result<LedgerSnapshot> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }

        let overflow = || Error::InvalidAmount(amount);
        let (supplied, borrowed) = match mode {
            ActionMode::Supply => (
                snapshot.total_supplied.checked_add(amount).ok_or_else(overflow)?,
                snapshot.total_borrowed,
            ),
            ActionMode::Borrow => (
                snapshot.total_supplied,
                snapshot.total_borrowed.checked_add(amount).ok_or_else(overflow)?,
            ),
        };

        Ok(LedgerSnapshot::from_totals(supplied, borrowed, snapshot.ltv))
    }

    /// Check a borrow stays within the borrow limit
    pub fn check_borrow(&self, snapshot: &LedgerSnapshot, amount: Decimal) -> Result<()> {
        let projected = self.preview(snapshot, ActionMode::Borrow, amount)?;
        if projected.is_over_limit() {
            return Err(Error::BorrowLimitExceeded {
                requested: amount,
                capacity: self.borrow_capacity(snapshot),
            });
        }
        Ok(())
    }
}
