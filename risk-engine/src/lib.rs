//! Risk Engine for RWA lending positions
//!
//! Health assessment and advisory borrow-limit checks over ledger snapshots

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod health;
pub mod limits;

pub use error::{Error, Result};
pub use types::*;
pub use health::{HealthConfig, HealthMonitor};
pub use limits::LimitChecker;
