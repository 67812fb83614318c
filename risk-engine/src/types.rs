//! Core types for risk engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rwa_ledger_core::Ltv;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Comfortably inside the borrow limit
    Low,
    /// Utilization at or above the warning threshold
    Medium,
    /// Borrowed value exceeds the borrow limit
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Health of the current positions at one LTV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// LTV assessed at
    pub ltv: Ltv,

    /// Display health factor, `100 - ltv`
    pub display_health_factor: Decimal,

    /// `borrow_limit / total_borrowed`; `None` with nothing borrowed
    pub collateral_health_factor: Option<Decimal>,

    /// `total_borrowed / borrow_limit`; `None` when borrowing against a
    /// zero limit
    pub utilization: Option<Decimal>,

    /// Borrowing still available before the limit
    pub borrow_capacity: Decimal,

    /// Borrowed value above the limit
    pub liquidation_headroom: Decimal,

    /// Risk level
    pub risk_level: RiskLevel,

    /// Assessment timestamp
    pub assessed_at: DateTime<Utc>,
}

impl HealthAssessment {
    /// Positions are over the borrow limit
    pub fn is_liquidatable(&self) -> bool {
        self.risk_level == RiskLevel::High
    }
}
