//! Actor-based concurrency for the ledger
//!
//! One task owns the [`PositionLedger`]; every mutation and read goes through
//! its mailbox, so commits are serialized and readers never see a
//! half-applied action.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               LedgerHandle (Clone)                    │
//! │  validate → sleep(commit_delay) → Commit message      │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              LedgerActor (Single Task)                │
//! │        PositionLedger::apply_action / snapshot        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The simulated latency is spent in the caller's task, before the commit
//! message is sent. Reads are therefore never queued behind a pending action,
//! and a caller that drops the future during the delay abandons the action
//! with no effect. [`LedgerHandle::submit`] moves the same flow into a
//! spawned task that always runs to completion.

use crate::metrics::Metrics;
use crate::positions::PositionLedger;
use crate::session::WalletState;
use crate::types::{ActionReceipt, ActionRequest, LedgerSnapshot, Ltv, Position, Symbol};
use crate::{Error, Result};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message sent to the ledger actor
#[derive(Debug)]
pub enum LedgerMessage {
    /// Apply a validated action
    Commit {
        /// Action to apply
        request: ActionRequest,
        /// Wallet state captured when the action was initiated
        wallet: WalletState,
        /// Updated position or rejection
        response: oneshot::Sender<Result<Position>>,
    },

    /// Aggregate totals
    Snapshot {
        /// LTV to compute the borrow limit at
        ltv: Ltv,
        /// Snapshot
        response: oneshot::Sender<LedgerSnapshot>,
    },

    /// Single position
    PositionFor {
        /// Asset symbol
        symbol: Symbol,
        /// Position (zero if none recorded)
        response: oneshot::Sender<Position>,
    },

    /// Copy of the whole ledger
    Export {
        /// Ledger copy
        response: oneshot::Sender<PositionLedger>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the position ledger
pub struct LedgerActor {
    /// Position state
    ledger: PositionLedger,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,

    /// Metrics
    metrics: Metrics,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(mailbox: mpsc::Receiver<LedgerMessage>, metrics: Metrics) -> Self {
        Self {
            ledger: PositionLedger::new(),
            mailbox,
            metrics,
        }
    }

    /// Run the actor event loop until shutdown or until every handle is gone
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Shutdown => {
                    debug!("Ledger actor shutting down");
                    break;
                }
                msg => self.handle_message(msg),
            }
        }
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::Commit {
                request,
                wallet,
                response,
            } => {
                let result = self.ledger.apply_action(&request, &wallet);
                if result.is_ok() {
                    self.metrics.set_open_positions(self.ledger.len());
                }
                let _ = response.send(result);
            }

            LedgerMessage::Snapshot { ltv, response } => {
                let _ = response.send(self.ledger.snapshot(ltv));
            }

            LedgerMessage::PositionFor { symbol, response } => {
                let _ = response.send(self.ledger.position_for(symbol.as_str()));
            }

            LedgerMessage::Export { response } => {
                let _ = response.send(self.ledger.clone());
            }

            LedgerMessage::Shutdown => {
                // Handled in run loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
    commit_delay: Duration,
    metrics: Metrics,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>, commit_delay: Duration, metrics: Metrics) -> Self {
        Self {
            sender,
            commit_delay,
            metrics,
        }
    }

    /// Simulated latency before a commit
    pub fn commit_delay(&self) -> Duration {
        self.commit_delay
    }

    /// Validate, wait out the commit delay, then apply the action
    ///
    /// Rejections return immediately without waiting.
    pub async fn apply_action(&self, request: ActionRequest, wallet: WalletState) -> Result<ActionReceipt> {
        self.run_action(Uuid::now_v7(), request, wallet).await
    }

    /// Run [`LedgerHandle::apply_action`] as a background task
    pub fn submit(&self, request: ActionRequest, wallet: WalletState) -> PendingAction {
        let action_id = Uuid::now_v7();
        let handle = self.clone();
        let task = tokio::spawn(async move { handle.run_action(action_id, request, wallet).await });

        PendingAction { action_id, task }
    }

    async fn run_action(
        &self,
        action_id: Uuid,
        request: ActionRequest,
        wallet: WalletState,
    ) -> Result<ActionReceipt> {
        let started = Instant::now();

        if let Err(e) = PositionLedger::validate(&request, &wallet) {
            warn!(
                %action_id,
                symbol = %request.symbol,
                mode = %request.mode,
                "Action rejected: {}", e
            );
            self.metrics.record_rejection(e.reason());
            return Err(e);
        }

        debug!(%action_id, delay_ms = self.commit_delay.as_millis() as u64, "Action pending");
        if !self.commit_delay.is_zero() {
            tokio::time::sleep(self.commit_delay).await;
        }

        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Commit {
                request: request.clone(),
                wallet,
                response: tx,
            })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        let committed = rx
            .await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?;

        let position = match committed {
            Ok(position) => position,
            Err(e) => {
                warn!(
                    %action_id,
                    symbol = %request.symbol,
                    mode = %request.mode,
                    "Action rejected at commit: {}", e
                );
                if e.is_rejection() {
                    self.metrics.record_rejection(e.reason());
                }
                return Err(e);
            }
        };

        self.metrics.record_action(request.mode.as_str());
        self.metrics
            .record_commit_latency(started.elapsed().as_secs_f64());

        info!(
            %action_id,
            symbol = %request.symbol,
            mode = %request.mode,
            amount_usd = %request.amount_usd,
            "Action committed"
        );

        Ok(ActionReceipt {
            action_id,
            request,
            position,
            committed_at: Utc::now(),
        })
    }

    /// Aggregate totals at `ltv`
    pub async fn snapshot(&self, ltv: Ltv) -> Result<LedgerSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Snapshot { ltv, response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Position for `symbol`
    pub async fn position_for(&self, symbol: impl Into<Symbol>) -> Result<Position> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::PositionFor {
                symbol: symbol.into(),
                response: tx,
            })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Consistent copy of every position
    pub async fn export(&self) -> Result<PositionLedger> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Export { response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Action running in the background
///
/// Dropping this handle does not cancel the action.
#[derive(Debug)]
pub struct PendingAction {
    action_id: Uuid,
    task: JoinHandle<Result<ActionReceipt>>,
}

impl PendingAction {
    /// ID the receipt will carry
    pub fn action_id(&self) -> Uuid {
        self.action_id
    }

    /// Committed or rejected already
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the receipt or the rejection
    pub async fn wait(self) -> Result<ActionReceipt> {
        self.task
            .await
            .map_err(|e| Error::Concurrency(format!("Action task failed: {}", e)))?
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(mailbox_capacity: usize, commit_delay: Duration, metrics: Metrics) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity.max(1)); // Bounded channel for backpressure
    let actor = LedgerActor::new(rx, metrics.clone());

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx, commit_delay, metrics)
}
