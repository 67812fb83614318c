//! Portfolio summaries for the dashboard

use crate::catalog::AssetCatalog;
use crate::positions::PositionLedger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Portfolio value series, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioHistory {
    values: Vec<Decimal>,
}

/// Latest value against the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioChange {
    /// Most recent value (zero for an empty series)
    pub latest: Decimal,

    /// Value before it (the latest value when there is only one)
    pub previous: Decimal,

    /// `latest - previous`
    pub delta: Decimal,

    /// Delta as a percentage of `previous`, two decimals; zero when
    /// `previous` is zero
    pub percent: Decimal,
}

impl PortfolioHistory {
    /// Create from values, oldest first
    pub fn new(values: Vec<Decimal>) -> Self {
        Self { values }
    }

    /// Append the newest value
    pub fn record(&mut self, value: Decimal) {
        self.values.push(value);
    }

    /// Values, oldest first
    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    /// Change between the last two values
    pub fn change(&self) -> PortfolioChange {
        let latest = self.values.last().copied().unwrap_or(Decimal::ZERO);
        let previous = self
            .values
            .len()
            .checked_sub(2)
            .map_or(latest, |i| self.values[i]);
        let delta = latest - previous;
        let percent = if previous.is_zero() {
            Decimal::ZERO
        } else {
            (delta / previous * Decimal::ONE_HUNDRED).round_dp(2)
        };

        PortfolioChange {
            latest,
            previous,
            delta,
            percent,
        }
    }
}

/// Annualized yield of the current positions at catalog rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldSummary {
    /// Σ supplied × supply APR
    pub annual_supply_income: Decimal,

    /// Σ borrowed × borrow APR
    pub annual_borrow_cost: Decimal,

    /// Income minus cost
    pub net_annual: Decimal,

    /// Net annual yield over total supplied (percent, four decimals);
    /// `None` when nothing is supplied
    pub net_apr: Option<Decimal>,
}

impl YieldSummary {
    /// Compute from positions; symbols missing from the catalog earn and
    /// cost nothing
    pub fn compute(ledger: &PositionLedger, catalog: &AssetCatalog) -> Self {
        let mut annual_supply_income = Decimal::ZERO;
        let mut annual_borrow_cost = Decimal::ZERO;
        let mut total_supplied = Decimal::ZERO;

        for (symbol, position) in ledger.positions() {
            total_supplied += position.supplied_usd();

            let Some(asset) = catalog.get(symbol.as_str()) else {
                debug!("No catalog rates for {}", symbol);
                continue;
            };

            // Rate first: APRs are below 100%, so the products never exceed the totals
            annual_supply_income +=
                position.supplied_usd() * (asset.supply_apr / Decimal::ONE_HUNDRED);
            annual_borrow_cost +=
                position.borrowed_usd() * (asset.borrow_apr / Decimal::ONE_HUNDRED);
        }

        let net_annual = annual_supply_income - annual_borrow_cost;
        let net_apr = (total_supplied > Decimal::ZERO)
            .then(|| (net_annual / total_supplied * Decimal::ONE_HUNDRED).round_dp(4));

        Self {
            annual_supply_income,
            annual_borrow_cost,
            net_annual,
            net_apr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::WalletState;
    use crate::types::ActionRequest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_change() {
        let history = PortfolioHistory::new(
            [300, 312, 320, 315, 330, 342, 355, 349, 361, 372, 381, 395]
                .into_iter()
                .map(Decimal::from)
                .collect(),
        );

        let change = history.change();
        assert_eq!(change.latest, dec!(395));
        assert_eq!(change.previous, dec!(381));
        assert_eq!(change.delta, dec!(14));
        assert_eq!(change.percent, dec!(3.67));
    }

    #[test]
    fn test_change_short_series() {
        let empty = PortfolioHistory::default().change();
        assert_eq!(empty.latest, Decimal::ZERO);
        assert_eq!(empty.percent, Decimal::ZERO);

        let mut history = PortfolioHistory::default();
        history.record(dec!(120));
        let single = history.change();
        assert_eq!(single.previous, dec!(120));
        assert_eq!(single.delta, Decimal::ZERO);
    }

    #[test]
    fn test_change_negative() {
        let change = PortfolioHistory::new(vec![dec!(200), dec!(150)]).change();
        assert_eq!(change.delta, dec!(-50));
        assert_eq!(change.percent, dec!(-25));
    }

    #[test]
    fn test_yield_summary() {
        let wallet = WalletState::connected("0xabc");
        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(&ActionRequest::supply("UST", dec!(1000)), &wallet)
            .unwrap();
        ledger
            .apply_action(&ActionRequest::borrow("UST", dec!(500)), &wallet)
            .unwrap();

        let summary = YieldSummary::compute(&ledger, &AssetCatalog::lending_market());
        assert_eq!(summary.annual_supply_income, dec!(51.2));
        assert_eq!(summary.annual_borrow_cost, dec!(11.55));
        assert_eq!(summary.net_annual, dec!(39.65));
        assert_eq!(summary.net_apr, Some(dec!(3.965)));
    }

    #[test]
    fn test_yield_summary_empty_and_unknown() {
        let catalog = AssetCatalog::lending_market();
        let empty = YieldSummary::compute(&PositionLedger::new(), &catalog);
        assert_eq!(empty.net_apr, None);

        let mut ledger = PositionLedger::new();
        ledger
            .apply_action(
                &ActionRequest::supply("XYZ", dec!(100)),
                &WalletState::connected("0xabc"),
            )
            .unwrap();
        let unknown = YieldSummary::compute(&ledger, &catalog);
        assert_eq!(unknown.net_annual, Decimal::ZERO);
        assert_eq!(unknown.net_apr, Some(Decimal::ZERO));
    }
}
