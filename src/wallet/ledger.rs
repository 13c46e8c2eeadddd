//! Ledger implementation: idempotent, atomic wallet credits.

use super::{
    errors::{WalletError, WalletResult},
    models::{EntryReason, LedgerEntry, Wallet},
};
use crate::db::{DocumentStore, StoreError, WALLETS};
use chrono::Utc;
use std::sync::Arc;

/// Retries allowed for lost CAS races before a conflict surfaces.
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Wallet ledger
///
/// Owns every wallet document. A credit is a single compare-and-swap on the
/// user's wallet document, so balance, timestamp and the audit entry commit
/// together and two concurrent credits for the same user serialize without
/// lost updates. Wallets for different users never contend.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn DocumentStore>,
}

impl Ledger {
    /// Create a new ledger over a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Apply a positive balance delta to a user's wallet.
    ///
    /// The wallet is materialized at balance 0 on first credit. Exactly-once
    /// per `idempotency_key`: a retried request finds its prior entry and
    /// returns that entry's resulting balance without re-applying the delta.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Wallet owner
    /// * `amount` - Delta in minor units, must be positive
    /// * `idempotency_key` - Caller-supplied token making retries safe
    /// * `reason` - Audit category for the entry
    ///
    /// # Returns
    ///
    /// * `WalletResult<i64>` - The balance after the credit
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - `amount` was zero or negative
    /// * `WalletError::BalanceOverflow` - Balance would exceed `i64::MAX`
    /// * `WalletError::Conflict` - Lost too many concurrent races
    pub async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        idempotency_key: &str,
        reason: EntryReason,
    ) -> WalletResult<i64> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount(amount));
        }

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let now = Utc::now();
            let (mut wallet, version) = self.load_or_default(user_id).await?;

            // Duplicate request: report the balance the original produced.
            if let Some(entry) = wallet.entry_for_key(idempotency_key) {
                log::debug!(
                    "Duplicate credit {idempotency_key} for user {user_id}, returning prior balance"
                );
                return Ok(entry.balance_after);
            }

            let new_balance = wallet
                .balance
                .checked_add(amount)
                .ok_or(WalletError::BalanceOverflow)?;

            wallet.balance = new_balance;
            wallet.updated_at = now;
            wallet.entries.push(LedgerEntry {
                idempotency_key: idempotency_key.to_string(),
                amount,
                balance_after: new_balance,
                reason,
                created_at: now,
            });

            let fields = serde_json::to_value(&wallet)?;
            match self
                .store
                .upsert(WALLETS, user_id, fields, Some(version))
                .await
            {
                Ok(_) => {
                    log::info!(
                        "Credited {amount} to user {user_id} ({reason}), balance {new_balance}"
                    );
                    return Ok(new_balance);
                }
                // Lost the race; re-read, which also re-checks the key in
                // case the winner was this very request's twin.
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(WalletError::Conflict(user_id.to_string()))
    }

    /// Current balance for a user; 0 for a wallet that was never credited.
    pub async fn get_balance(&self, user_id: &str) -> WalletResult<i64> {
        let doc = self.store.get(WALLETS, user_id).await?;
        match doc {
            Some(doc) => {
                let wallet: Wallet = serde_json::from_value(doc.fields)?;
                Ok(wallet.balance)
            }
            None => Ok(0),
        }
    }

    /// Ledger entries for a user, newest first.
    pub async fn entries(&self, user_id: &str, limit: usize) -> WalletResult<Vec<LedgerEntry>> {
        let doc = self.store.get(WALLETS, user_id).await?;
        let Some(doc) = doc else {
            return Ok(Vec::new());
        };

        let wallet: Wallet = serde_json::from_value(doc.fields)?;
        // Entries are appended in application order; newest first is a
        // reversal, not a timestamp sort.
        let mut entries = wallet.entries;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    async fn load_or_default(&self, user_id: &str) -> WalletResult<(Wallet, u64)> {
        let doc = self.store.get(WALLETS, user_id).await?;
        match doc {
            Some(doc) => {
                let wallet: Wallet = serde_json::from_value(doc.fields)?;
                Ok((wallet, doc.version))
            }
            None => Ok((Wallet::empty(user_id, Utc::now()), 0)),
        }
    }
}
