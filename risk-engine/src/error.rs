//! Error types for risk engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Borrow would push debt past the borrow limit
    #[error("Borrow limit exceeded: requested {requested}, capacity {capacity}")]
    BorrowLimitExceeded {
        /// Requested borrow (USD)
        requested: Decimal,
        /// Remaining capacity (USD)
        capacity: Decimal,
    },

    /// Previewed amount was zero, negative, or would overflow a total
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
