//! Main ledger orchestration layer
//!
//! This module ties together the wallet session, asset catalog and actor
//! into a high-level API for simulated supply/borrow actions.
//!
//! # Example
//!
//! ```no_run
//! use rust_decimal::Decimal;
//! use rwa_ledger_core::{ActionRequest, Config, Ledger};
//!
//! #[tokio::main]
//! async fn main() -> rwa_ledger_core::Result<()> {
//!     let ledger = Ledger::open(Config::default()).await?;
//!     ledger.session().connect();
//!
//!     let receipt = ledger
//!         .apply_action(ActionRequest::supply("UST", Decimal::from(1000)))
//!         .await?;
//!     println!("{}", receipt.describe());
//!
//!     let snapshot = ledger.snapshot(ledger.default_ltv()).await?;
//!     println!("Borrow limit: {}", snapshot.borrow_limit);
//!
//!     ledger.shutdown().await
//! }
//! ```

use crate::{
    actor::{spawn_ledger_actor, LedgerHandle, PendingAction},
    catalog::AssetCatalog,
    metrics::Metrics,
    portfolio::YieldSummary,
    positions::PositionLedger,
    session::{FileStore, MemoryStore, SessionStore, WalletSession},
    types::{ActionReceipt, ActionRequest, LedgerSnapshot, Ltv, LtvPolicy, Position},
    Config, Error, Result,
};
use std::sync::Arc;
use tracing::info;

/// Main ledger interface
pub struct Ledger {
    /// Actor handle
    handle: LedgerHandle,

    /// Wallet gate for mutating actions
    session: Arc<WalletSession>,

    /// Reference data
    catalog: AssetCatalog,

    /// Metrics
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl Ledger {
    /// Open ledger with configuration
    pub async fn open(config: Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match &config.session.store_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        let session = Arc::new(WalletSession::open(
            store,
            config.session.default_address.clone(),
        ));

        let metrics = Metrics::new()
            .map_err(|e| Error::Config(format!("Failed to create metrics: {}", e)))?;

        let handle = spawn_ledger_actor(
            config.ledger.mailbox_capacity,
            config.ledger.commit_delay(),
            metrics.clone(),
        );

        info!(
            service = %config.service_name,
            commit_delay_ms = config.ledger.commit_delay_ms,
            wallet_connected = session.is_connected(),
            "Ledger opened"
        );

        Ok(Self {
            handle,
            session,
            catalog: AssetCatalog::lending_market(),
            metrics,
            config,
        })
    }

    /// Replace the asset catalog
    pub fn with_catalog(mut self, catalog: AssetCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Share an existing wallet session
    pub fn with_session(mut self, session: Arc<WalletSession>) -> Self {
        self.session = session;
        self
    }

    /// Wallet session
    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    /// Asset catalog
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// Metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// LTV selector bounds
    pub fn ltv_policy(&self) -> LtvPolicy {
        self.config.ltv
    }

    /// Clamp and snap a raw LTV selection
    pub fn select_ltv(&self, raw: i64) -> Ltv {
        self.config.ltv.select(raw)
    }

    /// Initial LTV selection
    pub fn default_ltv(&self) -> Ltv {
        self.config.ltv.default_ltv()
    }

    /// Supply or borrow, gated on the current wallet state
    pub async fn apply_action(&self, request: ActionRequest) -> Result<ActionReceipt> {
        self.handle.apply_action(request, self.session.state()).await
    }

    /// Supply or borrow in the background
    pub fn submit(&self, request: ActionRequest) -> PendingAction {
        self.handle.submit(request, self.session.state())
    }

    /// Aggregate totals at `ltv`
    pub async fn snapshot(&self, ltv: Ltv) -> Result<LedgerSnapshot> {
        self.handle.snapshot(ltv).await
    }

    /// Position for `symbol` (zero if none recorded)
    pub async fn position_for(&self, symbol: &str) -> Result<Position> {
        self.handle.position_for(symbol).await
    }

    /// Consistent copy of every position
    pub async fn positions(&self) -> Result<PositionLedger> {
        self.handle.export().await
    }

    /// Annualized yield of the current positions at catalog rates
    pub async fn yield_summary(&self) -> Result<YieldSummary> {
        let positions = self.positions().await?;
        Ok(YieldSummary::compute(&positions, &self.catalog))
    }

    /// Shutdown ledger
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down ledger");
        self.handle.shutdown().await
    }
}
