//! RWA Lending Ledger Core
//!
//! Simulated supply/borrow positions for a real-world-asset lending market.
//!
//! # Architecture
//!
//! - **Position Ledger**: per-symbol supplied/borrowed USD with derived totals
//! - **Single Writer**: one actor task owns the positions and serializes commits
//! - **Simulated Latency**: a fixed delay elapses before an action commits
//! - **Wallet Session**: explicit connect flag gating every mutation
//!
//! # Invariants
//!
//! - Supplied and borrowed amounts are never negative
//! - Rejected actions leave every position unchanged
//! - Snapshots are recomputed from positions, never cached
//! - `borrow_limit == total_supplied * ltv / 100` exactly

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod portfolio;
pub mod positions;
pub mod session;
pub mod types;

// Re-exports
pub use catalog::{Asset, AssetCatalog, AssetFilter, EarnProduct, RiskTier};
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use positions::PositionLedger;
pub use session::{WalletObserver, WalletSession, WalletState};
pub use types::{
    ActionMode, ActionReceipt, ActionRequest, LedgerSnapshot, Ltv, LtvPolicy, Position, Symbol,
};
