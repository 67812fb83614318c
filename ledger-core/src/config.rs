//! Configuration for the ledger

use crate::session::DEFAULT_WALLET_ADDRESS;
use crate::types::LtvPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Commit path configuration
    pub ledger: LedgerConfig,

    /// LTV selector bounds
    pub ltv: LtvPolicy,

    /// Wallet session configuration
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "rwa-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: LedgerConfig::default(),
            ltv: LtvPolicy::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Commit path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Simulated latency before an action commits (milliseconds)
    pub commit_delay_ms: u64,

    /// Actor mailbox capacity
    pub mailbox_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: 900,
            mailbox_capacity: 1000,
        }
    }
}

impl LedgerConfig {
    /// Commit delay as a duration
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }
}

/// Wallet session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Address reported when connecting
    pub default_address: String,

    /// JSON file backing the session (in-memory when unset)
    pub store_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_address: DEFAULT_WALLET_ADDRESS.to_string(),
            store_path: None,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(delay) = std::env::var("RWA_COMMIT_DELAY_MS") {
            config.ledger.commit_delay_ms = delay.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid RWA_COMMIT_DELAY_MS '{}': {}", delay, e))
            })?;
        }

        if let Ok(ltv) = std::env::var("RWA_DEFAULT_LTV") {
            let raw: i64 = ltv.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid RWA_DEFAULT_LTV '{}': {}", ltv, e))
            })?;
            config.ltv.default = config.ltv.select(raw).percent();
        }

        if let Ok(address) = std::env::var("RWA_WALLET_ADDRESS") {
            config.session.default_address = address;
        }

        if let Ok(path) = std::env::var("RWA_SESSION_FILE") {
            config.session.store_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "rwa-ledger");
        assert_eq!(config.ledger.commit_delay(), Duration::from_millis(900));
        assert_eq!(config.ltv.max, 70);
        assert_eq!(config.session.default_address, "0x1234...5678");
        assert!(config.session.store_path.is_none());
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            service_name = "rwa-testnet"
            service_version = "0.1.0"

            [ledger]
            commit_delay_ms = 0
            mailbox_capacity = 16

            [ltv]
            min = 0
            max = 80
            step = 10
            default = 40

            [session]
            default_address = "0xabc"
            store_path = "/tmp/wallet.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.commit_delay_ms, 0);
        assert_eq!(config.ltv.step, 10);
        assert_eq!(config.session.store_path, Some(PathBuf::from("/tmp/wallet.json")));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = Config::from_toml("ledger = 5").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
