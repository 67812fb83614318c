//! Position ledger
//!
//! Per-symbol supplied/borrowed USD and the aggregate figures derived from
//! them. [`PositionLedger::apply_action`] is the only mutator; totals are
//! recomputed on every [`PositionLedger::snapshot`] call and never cached.
//!
//! An action that would push a position, or either ledger-wide total, past
//! `Decimal::MAX` is rejected, so the totals always stay representable.

use crate::session::WalletState;
use crate::types::{ActionMode, ActionRequest, LedgerSnapshot, Ltv, Position, Symbol};
use crate::{Error, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Simulated positions for one wallet session
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    positions: BTreeMap<Symbol, Position>,
}

impl PositionLedger {
    /// Create empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Check an action against the wallet gate and the amount rule
    pub fn validate(request: &ActionRequest, wallet: &WalletState) -> Result<()> {
        if !wallet.is_connected() {
            return Err(Error::WalletNotConnected);
        }

        if request.amount_usd <= Decimal::ZERO {
            return Err(Error::InvalidAmount(request.amount_usd));
        }

        Ok(())
    }

    /// Apply a supply or borrow action and return the updated position
    ///
    /// Rejected actions leave every position untouched.
    pub fn apply_action(&mut self, request: &ActionRequest, wallet: &WalletState) -> Result<Position> {
        Self::validate(request, wallet)?;

        let overflow = || Error::AmountOverflow(request.amount_usd);

        self.total(request.mode)
            .checked_add(request.amount_usd)
            .ok_or_else(overflow)?;

        let updated = self
            .position_for(request.symbol.as_str())
            .checked_credit(request.mode, request.amount_usd)
            .ok_or_else(overflow)?;

        self.positions.insert(request.symbol.clone(), updated);
        Ok(updated)
    }

    /// Ledger-wide total for one side
    ///
    /// Cannot overflow: every committed action kept this total representable.
    fn total(&self, mode: ActionMode) -> Decimal {
        self.positions.values().map(|p| p.side(mode)).sum()
    }

    /// Position for `symbol`, zero if none recorded
    pub fn position_for(&self, symbol: &str) -> Position {
        self.positions.get(symbol).copied().unwrap_or(Position::ZERO)
    }

    /// Aggregate totals at the given LTV
    pub fn snapshot(&self, ltv: Ltv) -> LedgerSnapshot {
        LedgerSnapshot::from_totals(
            self.total(ActionMode::Supply),
            self.total(ActionMode::Borrow),
            ltv,
        )
    }

    /// Recorded positions, ordered by symbol
    pub fn positions(&self) -> impl Iterator<Item = (&Symbol, &Position)> {
        self.positions.iter()
    }

    /// Number of positions with something supplied
    pub fn supply_count(&self) -> usize {
        self.positions.values().filter(|p| p.is_supplying()).count()
    }

    /// Number of positions with something borrowed
    pub fn borrow_count(&self) -> usize {
        self.positions.values().filter(|p| p.is_borrowing()).count()
    }

    /// Number of recorded positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// No action has been applied yet
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DEFAULT_WALLET_ADDRESS;
    use rust_decimal_macros::dec;

    fn connected() -> WalletState {
        WalletState::connected(DEFAULT_WALLET_ADDRESS)
    }

    #[test]
    fn test_empty_snapshot() {
        let ledger = PositionLedger::new();
        let snapshot = ledger.snapshot(Ltv::new(35));

        assert_eq!(snapshot.total_supplied, Decimal::ZERO);
        assert_eq!(snapshot.total_borrowed, Decimal::ZERO);
        assert_eq!(snapshot.net_worth, Decimal::ZERO);
        assert_eq!(snapshot.borrow_limit, Decimal::ZERO);
        assert_eq!(snapshot.liquidation_headroom, Decimal::ZERO);
    }

    #[test]
    fn test_supply_creates_position() {
        let mut ledger = PositionLedger::new();
        let position = ledger
            .apply_action(&ActionRequest::supply("UST", dec!(1000)), &connected())
            .unwrap();

        assert_eq!(position.supplied_usd(), dec!(1000));
        assert_eq!(position.borrowed_usd(), Decimal::ZERO);
        assert_eq!(ledger.snapshot(Ltv::new(35)).borrow_limit, dec!(350));
    }

    #[test]
    fn test_supply_then_borrow() {
        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(&ActionRequest::supply("UST", dec!(1000)), &connected())
            .unwrap();
        ledger
            .apply_action(&ActionRequest::borrow("UST", dec!(500)), &connected())
            .unwrap();

        let snapshot = ledger.snapshot(Ltv::new(35));
        assert_eq!(snapshot.total_supplied, dec!(1000));
        assert_eq!(snapshot.total_borrowed, dec!(500));
        assert_eq!(snapshot.borrow_limit, dec!(350));
        assert_eq!(snapshot.liquidation_headroom, dec!(150));

        // Zero borrow is rejected and changes nothing
        let err = ledger
            .apply_action(&ActionRequest::borrow("UST", Decimal::ZERO), &connected())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
        assert_eq!(ledger.snapshot(Ltv::new(35)), snapshot);
    }

    #[test]
    fn test_disconnected_wallet_rejected() {
        let mut ledger = PositionLedger::new();
        let err = ledger
            .apply_action(
                &ActionRequest::supply("UST", dec!(10)),
                &WalletState::disconnected(),
            )
            .unwrap_err();

        assert!(matches!(err, Error::WalletNotConnected));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut ledger = PositionLedger::new();
        let err = ledger
            .apply_action(&ActionRequest::supply("REIT", dec!(-1)), &connected())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidAmount(amount) if amount == dec!(-1)));
        assert_eq!(ledger.position_for("REIT"), Position::ZERO);
    }

    #[test]
    fn test_wallet_checked_before_amount() {
        let request = ActionRequest::supply("UST", Decimal::ZERO);
        let err = PositionLedger::validate(&request, &WalletState::disconnected()).unwrap_err();
        assert!(matches!(err, Error::WalletNotConnected));
    }

    #[test]
    fn test_position_overflow_rejected() {
        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(&ActionRequest::supply("UST", Decimal::MAX), &connected())
            .unwrap();
        let before = ledger.snapshot(Ltv::new(35));

        let err = ledger
            .apply_action(&ActionRequest::supply("UST", Decimal::ONE), &connected())
            .unwrap_err();
        assert!(matches!(err, Error::AmountOverflow(amount) if amount == Decimal::ONE));
        assert!(err.is_rejection());
        assert_eq!(ledger.snapshot(Ltv::new(35)), before);
        assert_eq!(ledger.position_for("UST").supplied_usd(), Decimal::MAX);

        // The borrowed side has its own total
        ledger
            .apply_action(&ActionRequest::borrow("UST", dec!(500)), &connected())
            .unwrap();
        assert_eq!(ledger.snapshot(Ltv::new(35)).total_borrowed, dec!(500));
    }

    #[test]
    fn test_ledger_total_overflow_rejected() {
        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(&ActionRequest::supply("UST", Decimal::MAX), &connected())
            .unwrap();

        // Fits in a fresh GOLD position but not in the ledger-wide total
        let err = ledger
            .apply_action(&ActionRequest::supply("GOLD", Decimal::MAX), &connected())
            .unwrap_err();
        assert!(matches!(err, Error::AmountOverflow(_)));
        assert_eq!(ledger.position_for("GOLD"), Position::ZERO);
        assert_eq!(ledger.len(), 1);

        let snapshot = ledger.snapshot(Ltv::new(70));
        assert_eq!(snapshot.total_supplied, Decimal::MAX);
    }

    #[test]
    fn test_position_for_unknown_symbol() {
        let ledger = PositionLedger::new();
        assert_eq!(ledger.position_for("GOLD"), Position::ZERO);
    }

    #[test]
    fn test_counts() {
        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(&ActionRequest::supply("UST", dec!(100)), &connected())
            .unwrap();
        ledger
            .apply_action(&ActionRequest::supply("REIT", dec!(100)), &connected())
            .unwrap();
        ledger
            .apply_action(&ActionRequest::borrow("GOLD", dec!(40)), &connected())
            .unwrap();

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.supply_count(), 2);
        assert_eq!(ledger.borrow_count(), 1);

        let symbols: Vec<&str> = ledger.positions().map(|(s, _)| s.as_str()).collect();
        assert_eq!(symbols, vec!["GOLD", "REIT", "UST"]);
    }
}
