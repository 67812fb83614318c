//! Demo Orchestrator - walks a lending session end to end
//!
//! Connects the wallet, supplies and borrows against the seeded lending
//! market, then prints the resulting snapshot, health and yield.

use anyhow::Context;
use prometheus::{Encoder, TextEncoder};
use rust_decimal_macros::dec;
use rwa_ledger_core::{ActionRequest, AssetFilter, Config, Ledger};
use rwa_risk_engine::{HealthMonitor, LimitChecker};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    info!(
        service = %config.service_name,
        commit_delay_ms = config.ledger.commit_delay_ms,
        "Starting RWA lending demo"
    );

    let ledger = Ledger::open(config).await.context("opening ledger")?;

    println!("\n=== Lending market ===");
    for asset in ledger.catalog().filter(&AssetFilter::default()) {
        println!(
            "{:<5} {:<32} ${:>10}  supply APR {}  borrow APR {}",
            asset.symbol, asset.name, asset.price_usd, asset.supply_apr, asset.borrow_apr
        );
    }

    // Rejected while disconnected
    if let Err(err) = ledger.apply_action(ActionRequest::supply("UST", dec!(1000))).await {
        warn!(reason = err.reason(), "Action rejected: {}", err);
    }

    let wallet = ledger.session().connect();
    println!("\nWallet connected: {}", wallet.address().unwrap_or_default());

    let ltv = ledger.default_ltv();
    let checker = LimitChecker::new();
    let monitor = HealthMonitor::default();

    let supplied = ledger.apply_action(ActionRequest::supply("UST", dec!(1000))).await?;
    println!("{}", supplied.describe());

    let before_borrow = ledger.snapshot(ltv).await?;
    if let Err(err) = checker.check_borrow(&before_borrow, dec!(500)) {
        warn!("Borrow preview: {}", err);
    }

    let borrowed = ledger.apply_action(ActionRequest::borrow("UST", dec!(500))).await?;
    println!("{}", borrowed.describe());

    let snapshot = ledger.snapshot(ltv).await?;
    let assessment = monitor.assess(&snapshot);

    println!("\n=== Snapshot at {} LTV ===", ltv);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    println!("\n=== Health ===");
    println!("{}", serde_json::to_string_pretty(&assessment)?);

    // Same positions at the top of the LTV range
    let relaxed = ledger.select_ltv(i64::from(ledger.ltv_policy().max));
    let relaxed_assessment = monitor.assess(&ledger.snapshot(relaxed).await?);
    println!(
        "At {} LTV: risk {}, headroom ${}",
        relaxed, relaxed_assessment.risk_level, relaxed_assessment.liquidation_headroom
    );

    println!("\n=== Yield ===");
    println!("{}", serde_json::to_string_pretty(&ledger.yield_summary().await?)?);

    println!("\n=== Metrics ===");
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&ledger.metrics().registry().gather(), &mut buffer)
        .context("encoding metrics")?;
    println!("{}", String::from_utf8_lossy(&buffer));

    ledger.session().disconnect();
    ledger.shutdown().await?;
    info!("Demo complete");

    Ok(())
}
