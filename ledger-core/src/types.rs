//! Core types for the ledger
//!
//! All monetary values are USD amounts held as `Decimal` so the derived
//! figures (borrow limit, headroom) are exact.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Asset symbol (UST, PRIV, REIT, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create new symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side of a simulated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    /// Add collateral to the supplied side
    Supply,
    /// Draw against collateral on the borrowed side
    Borrow,
}

impl ActionMode {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMode::Supply => "supply",
            ActionMode::Borrow => "borrow",
        }
    }

    /// Past-tense verb for confirmations
    pub fn past_tense(&self) -> &'static str {
        match self {
            ActionMode::Supply => "Supplied",
            ActionMode::Borrow => "Borrowed",
        }
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supplied and borrowed USD for one asset
///
/// Both sides only ever grow through [`Position::credit`] with a positive
/// amount, so neither can go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    supplied_usd: Decimal,
    borrowed_usd: Decimal,
}

impl Position {
    /// Position with nothing supplied or borrowed
    pub const ZERO: Position = Position {
        supplied_usd: Decimal::ZERO,
        borrowed_usd: Decimal::ZERO,
    };

    /// Supplied USD
    pub fn supplied_usd(&self) -> Decimal {
        self.supplied_usd
    }

    /// Borrowed USD
    pub fn borrowed_usd(&self) -> Decimal {
        self.borrowed_usd
    }

    /// Supplied minus borrowed
    pub fn net_usd(&self) -> Decimal {
        self.supplied_usd - self.borrowed_usd
    }

    /// Has a non-zero supplied side
    pub fn is_supplying(&self) -> bool {
        self.supplied_usd > Decimal::ZERO
    }

    /// Has a non-zero borrowed side
    pub fn is_borrowing(&self) -> bool {
        self.borrowed_usd > Decimal::ZERO
    }

    /// Amount on the side `mode` adds to
    pub fn side(&self, mode: ActionMode) -> Decimal {
        match mode {
            ActionMode::Supply => self.supplied_usd,
            ActionMode::Borrow => self.borrowed_usd,
        }
    }

    /// Position with a validated (strictly positive) amount added to one
    /// side, `None` if that side would overflow
    pub(crate) fn checked_credit(&self, mode: ActionMode, amount_usd: Decimal) -> Option<Position> {
        debug_assert!(amount_usd > Decimal::ZERO);
        let mut next = *self;
        match mode {
            ActionMode::Supply => next.supplied_usd = self.supplied_usd.checked_add(amount_usd)?,
            ActionMode::Borrow => next.borrowed_usd = self.borrowed_usd.checked_add(amount_usd)?,
        }
        Some(next)
    }
}

/// Loan-to-value percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ltv(u8);

impl Ltv {
    /// Create new LTV (saturates at 100)
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Raw percentage
    pub fn percent(&self) -> u8 {
        self.0
    }

    /// `percent / 100` as an exact decimal
    pub fn ratio(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }
}

impl fmt::Display for Ltv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Bounds and granularity of the LTV selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtvPolicy {
    /// Lowest selectable LTV
    pub min: u8,

    /// Highest selectable LTV
    pub max: u8,

    /// Step between selectable values
    pub step: u8,

    /// Initial selection
    pub default: u8,
}

impl Default for LtvPolicy {
    fn default() -> Self {
        Self {
            min: 0,
            max: 70,
            step: 5,
            default: 35,
        }
    }
}

impl LtvPolicy {
    /// Clamp a raw selection into range and snap it to the nearest step
    /// (halfway values round up).
    pub fn select(&self, raw: i64) -> Ltv {
        let min = i64::from(self.min);
        let max = i64::from(self.max.max(self.min));
        let step = i64::from(self.step.max(1));

        // Largest step-aligned value not above max
        let top = min + (max - min) / step * step;

        let offset = raw.clamp(min, max) - min;
        let lower = offset / step * step;
        let snapped = if (offset - lower) * 2 >= step {
            lower + step
        } else {
            lower
        };

        let value = (min + snapped).min(top);
        Ltv::new(u8::try_from(value).unwrap_or(u8::MAX))
    }

    /// Initial selection, passed through [`LtvPolicy::select`]
    pub fn default_ltv(&self) -> Ltv {
        self.select(i64::from(self.default))
    }

    /// Every selectable value in ascending order
    pub fn steps(&self) -> Vec<Ltv> {
        let step = usize::from(self.step.max(1));
        (self.min..=self.max.max(self.min))
            .step_by(step)
            .map(Ltv::new)
            .collect()
    }
}

/// A request to supply or borrow against one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Target asset
    pub symbol: Symbol,

    /// Supply or borrow
    pub mode: ActionMode,

    /// USD amount, must be strictly positive
    pub amount_usd: Decimal,
}

impl ActionRequest {
    /// Create new request
    pub fn new(symbol: impl Into<Symbol>, mode: ActionMode, amount_usd: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            mode,
            amount_usd,
        }
    }

    /// Supply request
    pub fn supply(symbol: impl Into<Symbol>, amount_usd: Decimal) -> Self {
        Self::new(symbol, ActionMode::Supply, amount_usd)
    }

    /// Borrow request
    pub fn borrow(symbol: impl Into<Symbol>, amount_usd: Decimal) -> Self {
        Self::new(symbol, ActionMode::Borrow, amount_usd)
    }
}

/// Outcome of a committed action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReceipt {
    /// Unique action ID (UUIDv7 for time-ordering)
    pub action_id: Uuid,

    /// Request that was applied
    pub request: ActionRequest,

    /// Position after the action
    pub position: Position,

    /// Commit timestamp
    pub committed_at: DateTime<Utc>,
}

impl ActionReceipt {
    /// One-line confirmation, e.g. `Supplied $1000 UST`
    pub fn describe(&self) -> String {
        format!(
            "{} ${} {}",
            self.request.mode.past_tense(),
            self.request.amount_usd,
            self.request.symbol
        )
    }
}

/// Aggregate figures derived from all positions at one LTV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// LTV the snapshot was computed at
    pub ltv: Ltv,

    /// Σ supplied
    pub total_supplied: Decimal,

    /// Σ borrowed
    pub total_borrowed: Decimal,

    /// Supplied minus borrowed
    pub net_worth: Decimal,

    /// `total_supplied * ltv / 100`
    pub borrow_limit: Decimal,

    /// `max(0, total_borrowed - borrow_limit)`
    pub liquidation_headroom: Decimal,
}

impl LedgerSnapshot {
    /// Derive every field from the two totals
    pub fn from_totals(total_supplied: Decimal, total_borrowed: Decimal, ltv: Ltv) -> Self {
        let borrow_limit = total_supplied * ltv.ratio();
        Self {
            ltv,
            total_supplied,
            total_borrowed,
            net_worth: total_supplied - total_borrowed,
            borrow_limit,
            liquidation_headroom: (total_borrowed - borrow_limit).max(Decimal::ZERO),
        }
    }

    /// Borrowed value exceeds the borrow limit
    pub fn is_over_limit(&self) -> bool {
        self.liquidation_headroom > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ltv_policy_clamps_and_snaps() {
        let policy = LtvPolicy::default();
        assert_eq!(policy.select(-10).percent(), 0);
        assert_eq!(policy.select(35).percent(), 35);
        assert_eq!(policy.select(36).percent(), 35);
        assert_eq!(policy.select(37).percent(), 35);
        assert_eq!(policy.select(38).percent(), 40);
        assert_eq!(policy.select(68).percent(), 70);
        assert_eq!(policy.select(250).percent(), 70);
        assert_eq!(policy.default_ltv().percent(), 35);
    }

    #[test]
    fn test_ltv_policy_unaligned_max() {
        let policy = LtvPolicy {
            min: 0,
            max: 72,
            step: 5,
            default: 35,
        };
        assert_eq!(policy.select(72).percent(), 70);
        assert_eq!(policy.steps().last().map(Ltv::percent), Some(70));
    }

    #[test]
    fn test_ltv_steps() {
        let steps = LtvPolicy::default().steps();
        assert_eq!(steps.len(), 15);
        assert_eq!(steps[0], Ltv::new(0));
        assert_eq!(steps[14], Ltv::new(70));
    }

    #[test]
    fn test_ltv_ratio() {
        assert_eq!(Ltv::new(35).ratio(), dec!(0.35));
        assert_eq!(Ltv::new(200).percent(), 100);
    }

    #[test]
    fn test_position_credit() {
        let position = Position::ZERO
            .checked_credit(ActionMode::Supply, dec!(1000))
            .and_then(|p| p.checked_credit(ActionMode::Borrow, dec!(250.50)))
            .unwrap();

        assert_eq!(position.supplied_usd(), dec!(1000));
        assert_eq!(position.borrowed_usd(), dec!(250.50));
        assert_eq!(position.net_usd(), dec!(749.50));
        assert!(position.is_supplying());
        assert!(position.is_borrowing());
    }

    #[test]
    fn test_position_credit_overflow() {
        let full = Position::ZERO
            .checked_credit(ActionMode::Supply, Decimal::MAX)
            .unwrap();
        assert_eq!(full.side(ActionMode::Supply), Decimal::MAX);
        assert!(full.checked_credit(ActionMode::Supply, Decimal::ONE).is_none());
        assert!(full.checked_credit(ActionMode::Borrow, Decimal::ONE).is_some());
    }

    #[test]
    fn test_snapshot_from_totals_at_max() {
        let snapshot = LedgerSnapshot::from_totals(Decimal::MAX, Decimal::MAX, Ltv::new(70));
        assert!(snapshot.borrow_limit < Decimal::MAX);
        assert_eq!(snapshot.net_worth, Decimal::ZERO);
        assert!(snapshot.is_over_limit());
    }

    #[test]
    fn test_snapshot_from_totals() {
        let snapshot = LedgerSnapshot::from_totals(dec!(1000), dec!(500), Ltv::new(35));
        assert_eq!(snapshot.borrow_limit, dec!(350));
        assert_eq!(snapshot.liquidation_headroom, dec!(150));
        assert_eq!(snapshot.net_worth, dec!(500));
        assert!(snapshot.is_over_limit());

        let safe = LedgerSnapshot::from_totals(dec!(1000), dec!(100), Ltv::new(35));
        assert_eq!(safe.liquidation_headroom, Decimal::ZERO);
        assert!(!safe.is_over_limit());
    }

    #[test]
    fn test_receipt_describe() {
        let receipt = ActionReceipt {
            action_id: Uuid::now_v7(),
            request: ActionRequest::supply("UST", dec!(1000)),
            position: Position::ZERO,
            committed_at: Utc::now(),
        };
        assert_eq!(receipt.describe(), "Supplied $1000 UST");
    }

    #[test]
    fn test_action_mode_serde() {
        let json = serde_json::to_string(&ActionMode::Borrow).unwrap();
        assert_eq!(json, "\"borrow\"");
    }
}
