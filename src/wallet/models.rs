//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wallet model
///
/// One wallet per user, lazily materialized on first credit. The balance is
/// integral minor units (paisa) and always equals the sum of the applied
/// entry amounts. The entry list is the auditable ledger; it lives inside
/// the wallet document so balance, timestamp and audit trail commit as a
/// single atomic write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: String,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
}

impl Wallet {
    /// A zero-balance wallet for a user that has never been credited.
    pub fn empty(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            balance: 0,
            updated_at: now,
            entries: Vec::new(),
        }
    }

    /// Find the entry applied under an idempotency key, if any.
    pub fn entry_for_key(&self, idempotency_key: &str) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .find(|e| e.idempotency_key == idempotency_key)
    }
}

/// Ledger entry model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub idempotency_key: String,
    pub amount: i64,
    pub balance_after: i64,
    pub reason: EntryReason,
    pub created_at: DateTime<Utc>,
}

/// Why a balance delta was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryReason {
    AdminCredit,
    PrizePayout,
    Refund,
}

impl std::fmt::Display for EntryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryReason::AdminCredit => write!(f, "admin_credit"),
            EntryReason::PrizePayout => write!(f, "prize_payout"),
            EntryReason::Refund => write!(f, "refund"),
        }
    }
}
