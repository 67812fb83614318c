//! Error types for the ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Action amount was zero or negative
    #[error("Invalid amount: {0} (amount must be greater than zero)")]
    InvalidAmount(Decimal),

    /// Action would push a position or a ledger total past the largest
    /// representable amount
    #[error("Amount overflow: adding {0} exceeds the largest representable total")]
    AmountOverflow(Decimal),

    /// Mutating action attempted without a connected wallet
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Asset catalog seed is malformed (duplicate symbol, etc.)
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error (session store)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for rejections of a user action; the ledger is left unchanged
    /// and the caller should re-prompt.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_) | Error::AmountOverflow(_) | Error::WalletNotConnected
        )
    }

    /// Short label used for metrics and notifications
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidAmount(_) => "invalid_amount",
            Error::AmountOverflow(_) => "amount_overflow",
            Error::WalletNotConnected => "wallet_not_connected",
            Error::InvalidCatalog(_) => "invalid_catalog",
            Error::Concurrency(_) => "concurrency",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections() {
        assert!(Error::WalletNotConnected.is_rejection());
        assert!(Error::InvalidAmount(Decimal::ZERO).is_rejection());
        assert!(Error::AmountOverflow(Decimal::MAX).is_rejection());
        assert_eq!(Error::AmountOverflow(Decimal::ONE).reason(), "amount_overflow");
        assert!(!Error::Concurrency("closed".to_string()).is_rejection());
    }

    #[test]
    fn test_invalid_amount_message() {
        let err = Error::InvalidAmount(Decimal::from(-5));
        assert!(err.to_string().contains("greater than zero"));
        assert_eq!(err.reason(), "invalid_amount");
    }
}
