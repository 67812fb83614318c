//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `rwa_ledger_actions_total{mode}` - Committed supply/borrow actions
//! - `rwa_ledger_rejections_total{reason}` - Rejected actions
//! - `rwa_ledger_commit_latency_seconds` - Submit-to-commit latency
//! - `rwa_ledger_open_positions` - Recorded positions

use prometheus::{Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Committed actions by mode
    pub actions_total: IntCounterVec,

    /// Rejected actions by reason
    pub rejections_total: IntCounterVec,

    /// Submit-to-commit latency
    pub commit_latency: Histogram,

    /// Recorded positions
    pub open_positions: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector on a private registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let actions_total = IntCounterVec::new(
            Opts::new("rwa_ledger_actions_total", "Committed supply/borrow actions"),
            &["mode"],
        )?;
        registry.register(Box::new(actions_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new("rwa_ledger_rejections_total", "Rejected actions"),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let commit_latency = Histogram::with_opts(
            HistogramOpts::new(
                "rwa_ledger_commit_latency_seconds",
                "Submit-to-commit latency",
            )
            .buckets(vec![0.001, 0.010, 0.100, 0.250, 0.500, 1.0, 2.0, 5.0]),
        )?;
        registry.register(Box::new(commit_latency.clone()))?;

        let open_positions = IntGauge::new("rwa_ledger_open_positions", "Recorded positions")?;
        registry.register(Box::new(open_positions.clone()))?;

        Ok(Self {
            actions_total,
            rejections_total,
            commit_latency,
            open_positions,
            registry,
        })
    }

    /// Record committed action
    pub fn record_action(&self, mode: &str) {
        self.actions_total.with_label_values(&[mode]).inc();
    }

    /// Record rejected action
    pub fn record_rejection(&self, reason: &str) {
        self.rejections_total.with_label_values(&[reason]).inc();
    }

    /// Record submit-to-commit latency
    pub fn record_commit_latency(&self, duration_seconds: f64) {
        self.commit_latency.observe(duration_seconds);
    }

    /// Update recorded position count
    pub fn set_open_positions(&self, count: usize) {
        self.open_positions.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
