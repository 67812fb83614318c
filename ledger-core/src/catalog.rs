//! Asset catalog
//!
//! Reference data seeded at startup and read-only afterwards: the lending
//! market (assets that can be supplied or borrowed) and the earn products.

use crate::types::Symbol;
use crate::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Category filters offered by the market, in display order
pub const CATEGORIES: [&str; 6] = [
    "All",
    "Treasuries",
    "Private Credit",
    "Real Estate",
    "Commodities",
    "RWA",
];

/// Lending market asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique symbol
    pub symbol: Symbol,

    /// Display name
    pub name: String,

    /// Unit price (USD)
    pub price_usd: Decimal,

    /// Category tags
    pub tags: Vec<String>,

    /// Market-wide supplied units
    pub supply_units: Decimal,

    /// Market-wide supplied value (USD)
    pub supply_usd: Decimal,

    /// Market-wide borrowed units
    pub borrow_units: Decimal,

    /// Market-wide borrowed value (USD)
    pub borrow_usd: Decimal,

    /// Supply-side annual rate (percent)
    pub supply_apr: Decimal,

    /// Borrow-side annual rate (percent)
    pub borrow_apr: Decimal,
}

impl Asset {
    /// Tagged with `category`; "All" matches every asset
    pub fn in_category(&self, category: &str) -> bool {
        category == "All" || self.tags.iter().any(|t| t == category)
    }

    /// Case-insensitive match on symbol or name; empty query matches
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.symbol.as_str().to_lowercase().contains(&query)
            || self.name.to_lowercase().contains(&query)
    }
}

/// Category plus free-text search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilter {
    /// Category ("All" for no restriction)
    pub category: String,

    /// Search text
    pub query: String,
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self {
            category: "All".to_string(),
            query: String::new(),
        }
    }
}

impl AssetFilter {
    /// Filter on a category
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Add search text
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Asset passes both checks
    pub fn matches(&self, asset: &Asset) -> bool {
        asset.in_category(&self.category) && asset.matches_query(&self.query)
    }
}

/// Ordered, read-only asset list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    /// Build from a seed; symbols must be unique
    pub fn from_assets(assets: Vec<Asset>) -> Result<Self> {
        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.symbol.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate symbol {}",
                    asset.symbol
                )));
            }
        }
        Ok(Self { assets })
    }

    /// Testnet lending market seed
    pub fn lending_market() -> Self {
        Self {
            assets: vec![
                market_asset(
                    "UST",
                    "Tokenized U.S. Treasuries",
                    &["Treasuries", "RWA"],
                    [dec!(37190000), dec!(125660000), dec!(19970000), dec!(67470000)],
                    (dec!(5.12), dec!(2.31)),
                ),
                market_asset(
                    "PRIV",
                    "Private Credit Note",
                    &["Private Credit", "RWA"],
                    [dec!(34390000), dec!(116320000), dec!(846840), dec!(2860000)],
                    (dec!(8.4), dec!(3.28)),
                ),
                market_asset(
                    "REIT",
                    "Tokenized Real Estate",
                    &["Real Estate", "RWA"],
                    [dec!(92990000), dec!(92970000), dec!(83970000), dec!(83950000)],
                    (dec!(6.12), dec!(4.7)),
                ),
                market_asset(
                    "GOLD",
                    "Tokenized Gold",
                    &["Commodities", "RWA"],
                    [dec!(614250), dec!(74470000), dec!(212250), dec!(25730000)],
                    (dec!(1.82), dec!(0.43)),
                ),
            ],
        }
    }

    /// Look up by symbol
    pub fn get(&self, symbol: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.symbol.as_str() == symbol)
    }

    /// All assets in seed order
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    /// Assets passing `filter`, in seed order
    pub fn filter<'a>(&'a self, filter: &'a AssetFilter) -> impl Iterator<Item = &'a Asset> + 'a {
        self.assets.iter().filter(move |a| filter.matches(a))
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Catalog has no assets
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::lending_market()
    }
}

fn market_asset(
    symbol: &str,
    name: &str,
    tags: &[&str],
    [supply_units, supply_usd, borrow_units, borrow_usd]: [Decimal; 4],
    (supply_apr, borrow_apr): (Decimal, Decimal),
) -> Asset {
    Asset {
        symbol: Symbol::new(symbol),
        name: name.to_string(),
        price_usd: Decimal::ONE,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        supply_units,
        supply_usd,
        borrow_units,
        borrow_usd,
        supply_apr,
        borrow_apr,
    }
}

/// Risk tier shown on earn products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Yield product on the earn page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnProduct {
    /// Symbol
    pub symbol: Symbol,

    /// Display name
    pub name: String,

    /// Annual percentage yield
    pub apy: Decimal,

    /// Total value locked (USD)
    pub tvl_usd: Decimal,

    /// Liquidity still open for deposits (USD)
    pub available_usd: Decimal,

    /// Minimum lock period (days)
    pub min_lock_days: u32,

    /// Risk tier
    pub risk: RiskTier,
}

/// Earn products seed
pub fn earn_products() -> Vec<EarnProduct> {
    let product = |symbol: &str, name: &str, apy, tvl_usd, available_usd, min_lock_days, risk| {
        EarnProduct {
            symbol: Symbol::new(symbol),
            name: name.to_string(),
            apy,
            tvl_usd,
            available_usd,
            min_lock_days,
            risk,
        }
    };

    vec![
        product("UST", "US Treasuries (T-Bills)", dec!(4.2), dec!(128400000), dec!(36200000), 7, RiskTier::Low),
        product("PC1", "Private Credit Pool A", dec!(8.1), dec!(72800000), dec!(12400000), 30, RiskTier::Medium),
        product("REIT", "Tokenized Real Estate Fund", dec!(5.6), dec!(54900000), dec!(8700000), 14, RiskTier::Medium),
        product("GLD", "Gold-Backed Notes", dec!(3.3), dec!(21500000), dec!(9400000), 7, RiskTier::Low),
    ]
}
