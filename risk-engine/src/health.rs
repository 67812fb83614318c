//! Health assessment

use crate::{Error, HealthAssessment, Result, RiskLevel};
use rust_decimal::Decimal;
use rwa_ledger_core::{LedgerSnapshot, Ltv};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Health configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Utilization (0-1] at which positions are flagged Medium
    pub warning_utilization: Decimal,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            warning_utilization: Decimal::new(80, 2), // 80%
        }
    }
}

/// Health factor shown next to the LTV selector: `100 - ltv`
pub fn display_health_factor(ltv: Ltv) -> Decimal {
    Decimal::ONE_HUNDRED - Decimal::from(ltv.percent())
}

/// Collateral-based health factor: `borrow_limit / total_borrowed`
///
/// Below 1 means the position is over its borrow limit. Saturates at
/// `Decimal::MAX` for dust-sized debt.
pub fn collateral_health_factor(snapshot: &LedgerSnapshot) -> Option<Decimal> {
    if snapshot.total_borrowed.is_zero() {
        return None;
    }
    Some(saturating_ratio(snapshot.borrow_limit, snapshot.total_borrowed))
}

/// Share of the borrow limit in use
pub fn utilization(snapshot: &LedgerSnapshot) -> Option<Decimal> {
    if snapshot.borrow_limit.is_zero() {
        return snapshot.total_borrowed.is_zero().then_some(Decimal::ZERO);
    }
    Some(saturating_ratio(snapshot.total_borrowed, snapshot.borrow_limit))
}

fn saturating_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .map_or(Decimal::MAX, |ratio| ratio.round_dp(4))
}

/// Health monitor
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    config: HealthConfig,
}

impl HealthMonitor {
    /// Create new monitor
    pub fn new(config: HealthConfig) -> Result<Self> {
        if config.warning_utilization <= Decimal::ZERO || config.warning_utilization > Decimal::ONE {
            return Err(Error::InvalidConfig(format!(
                "warning_utilization must be in (0, 1], got {}",
                config.warning_utilization
            )));
        }
        Ok(Self { config })
    }

    /// Assess a snapshot
    pub fn assess(&self, snapshot: &LedgerSnapshot) -> HealthAssessment {
        let utilization = utilization(snapshot);

        let risk_level = if snapshot.is_over_limit() {
            RiskLevel::High
        } else if utilization.map_or(false, |u| u >= self.config.warning_utilization) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        if risk_level == RiskLevel::High {
            warn!(
                ltv = %snapshot.ltv,
                headroom = %snapshot.liquidation_headroom,
                "Positions over borrow limit"
            );
        }

        HealthAssessment {
            ltv: snapshot.ltv,
            display_health_factor: display_health_factor(snapshot.ltv),
            collateral_health_factor: collateral_health_factor(snapshot),
            utilization,
            borrow_capacity: (snapshot.borrow_limit - snapshot.total_borrowed).max(Decimal::ZERO),
            liquidation_headroom: snapshot.liquidation_headroom,
            risk_level,
            assessed_at: chrono::Utc::now(),
        }
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self {
            config: HealthConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn snapshot(supplied: Decimal, borrowed: Decimal, ltv: u8) -> LedgerSnapshot {
        LedgerSnapshot::from_totals(supplied, borrowed, Ltv::new(ltv))
    }

    #[test]
    fn test_display_health_factor() {
        assert_eq!(display_health_factor(Ltv::new(35)), dec!(65));
        assert_eq!(display_health_factor(Ltv::new(0)), dec!(100));
        assert_eq!(display_health_factor(Ltv::new(70)), dec!(30));
    }

    #[test]
    fn test_empty_positions_are_low_risk() {
        let assessment = HealthMonitor::default().assess(&snapshot(Decimal::ZERO, Decimal::ZERO, 35));

        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.collateral_health_factor, None);
        assert_eq!(assessment.utilization, Some(Decimal::ZERO));
        assert_eq!(assessment.borrow_capacity, Decimal::ZERO);
    }

    #[test]
    fn test_over_limit_is_high_risk() {
        let assessment = HealthMonitor::default().assess(&snapshot(dec!(1000), dec!(500), 35));

        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment.is_liquidatable());
        assert_eq!(assessment.liquidation_headroom, dec!(150));
        assert_eq!(assessment.collateral_health_factor, Some(dec!(0.7)));
        assert_eq!(assessment.borrow_capacity, Decimal::ZERO);
    }

    #[test]
    fn test_warning_utilization() {
        let monitor = HealthMonitor::default();

        // 300 of 350 limit: ~86% utilization
        let warning = monitor.assess(&snapshot(dec!(1000), dec!(300), 35));
        assert_eq!(warning.risk_level, RiskLevel::Medium);
        assert_eq!(warning.borrow_capacity, dec!(50));

        let safe = monitor.assess(&snapshot(dec!(1000), dec!(100), 35));
        assert_eq!(safe.risk_level, RiskLevel::Low);
        assert_eq!(safe.collateral_health_factor, Some(dec!(3.5)));
    }

    #[test]
    fn test_borrowing_against_zero_limit() {
        let assessment = HealthMonitor::default().assess(&snapshot(dec!(1000), dec!(10), 0));
        assert_eq!(assessment.utilization, None);
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_ratios_saturate() {
        let lopsided = LedgerSnapshot {
            ltv: Ltv::new(70),
            total_supplied: Decimal::MAX,
            total_borrowed: dec!(0.5),
            net_worth: Decimal::MAX,
            borrow_limit: Decimal::MAX,
            liquidation_headroom: Decimal::ZERO,
        };
        assert_eq!(collateral_health_factor(&lopsided), Some(Decimal::MAX));

        let drowning = LedgerSnapshot {
            total_borrowed: Decimal::MAX,
            borrow_limit: dec!(0.5),
            ..lopsided
        };
        assert_eq!(utilization(&drowning), Some(Decimal::MAX));
    }

    #[test]
    fn test_invalid_config() {
        let result = HealthMonitor::new(HealthConfig {
            warning_utilization: dec!(1.5),
        });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    proptest! {
        /// Property: High risk exactly when borrowed exceeds the limit
        #[test]
        fn prop_high_risk_iff_over_limit(
            supplied in 0u64..10_000_000u64,
            borrowed in 0u64..10_000_000u64,
            ltv in 0u8..=70,
        ) {
            let snapshot = snapshot(Decimal::from(supplied), Decimal::from(borrowed), ltv);
            let assessment = HealthMonitor::default().assess(&snapshot);

            prop_assert_eq!(assessment.is_liquidatable(), snapshot.liquidation_headroom > Decimal::ZERO);
            prop_assert!(assessment.borrow_capacity >= Decimal::ZERO);
        }
    }
}
