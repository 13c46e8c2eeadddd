//! Wallet error types.

use crate::db::StoreError;
use thiserror::Error;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Credit amount was zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Balance would exceed i64::MAX
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Lost the CAS race on a wallet document too many times
    #[error("Concurrent update conflict on wallet for user {0}")]
    Conflict(String),

    /// Wallet document failed to round-trip
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
