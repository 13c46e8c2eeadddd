//! Admin operations facade.
//!
//! The single boundary the admin UI calls. It wires the tournament store,
//! the wallet ledger and the lifecycle service together, runs a
//! reconciliation pass before listing reads, and translates component
//! errors into the boundary taxonomy, nothing else. It holds no state of
//! its own.

use crate::db::{DocumentStore, StoreError};
use crate::lifecycle::LifecycleService;
use crate::tournament::{
    Tournament, TournamentDraft, TournamentError, TournamentId, TournamentPatch, TournamentStore,
};
use crate::wallet::{EntryReason, Ledger, LedgerEntry, WalletError};
use std::sync::Arc;
use thiserror::Error;

/// Boundary error taxonomy
///
/// Component failures are translated, never widened or swallowed.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Malformed or out-of-range input; surfaced verbatim, never retried
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-positive credit amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Lost a write race after bounded internal retries
    #[error("Concurrent update conflict, retry the operation")]
    Conflict,

    /// Persistence collaborator failure
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

fn translate_store(error: StoreError) -> AdminError {
    match error {
        StoreError::VersionConflict { .. } => AdminError::Conflict,
        other => AdminError::Unavailable(other.to_string()),
    }
}

impl From<TournamentError> for AdminError {
    fn from(error: TournamentError) -> Self {
        match error {
            TournamentError::NotFound(id) => AdminError::NotFound(format!("tournament {id}")),
            TournamentError::Validation(message) => AdminError::Validation(message),
            TournamentError::Full => AdminError::Validation("tournament is full".to_string()),
            TournamentError::AlreadyJoined => {
                AdminError::Validation("user already joined".to_string())
            }
            TournamentError::NotJoined => {
                AdminError::Validation("user has not joined".to_string())
            }
            TournamentError::RegistrationClosed => {
                AdminError::Validation("registration is closed".to_string())
            }
            TournamentError::Conflict(_) => AdminError::Conflict,
            TournamentError::Serialization(e) => AdminError::Unavailable(e.to_string()),
            TournamentError::Store(e) => translate_store(e),
        }
    }
}

impl From<WalletError> for AdminError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::InvalidAmount(amount) => AdminError::InvalidAmount(amount),
            WalletError::BalanceOverflow => {
                AdminError::Validation("credit would overflow the balance".to_string())
            }
            WalletError::Conflict(_) => AdminError::Conflict,
            WalletError::Serialization(e) => AdminError::Unavailable(e.to_string()),
            WalletError::Store(e) => translate_store(e),
        }
    }
}

/// Admin operations facade
#[derive(Clone)]
pub struct AdminOps {
    tournaments: TournamentStore,
    ledger: Ledger,
    lifecycle: LifecycleService,
}

impl AdminOps {
    /// Wire the facade over a single document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let tournaments = TournamentStore::new(store.clone());
        let ledger = Ledger::new(store);
        let lifecycle = LifecycleService::new(tournaments.clone());
        Self {
            tournaments,
            ledger,
            lifecycle,
        }
    }

    /// Create a tournament listing.
    pub async fn create_tournament(&self, draft: TournamentDraft) -> AdminResult<Tournament> {
        Ok(self.tournaments.create(draft).await?)
    }

    /// Update a tournament's descriptive fields and/or status.
    pub async fn update_tournament(
        &self,
        id: TournamentId,
        patch: TournamentPatch,
    ) -> AdminResult<Tournament> {
        Ok(self.tournaments.update(id, patch).await?)
    }

    /// Delete a tournament listing.
    pub async fn delete_tournament(&self, id: TournamentId) -> AdminResult<()> {
        Ok(self.tournaments.delete(id).await?)
    }

    /// Attach a result image reference produced by the upload collaborator.
    pub async fn attach_tournament_result(
        &self,
        id: TournamentId,
        result_ref: String,
    ) -> AdminResult<Tournament> {
        Ok(self.tournaments.attach_result(id, result_ref).await?)
    }

    /// Credit a user's wallet (admin top-up).
    pub async fn credit_user_wallet(
        &self,
        user_id: &str,
        amount: i64,
        idempotency_key: &str,
    ) -> AdminResult<i64> {
        Ok(self
            .ledger
            .credit(user_id, amount, idempotency_key, EntryReason::AdminCredit)
            .await?)
    }

    /// List tournaments for display, newest first.
    ///
    /// Runs a reconciliation pass first so the statuses shown are no staler
    /// than this attempt. Reconciliation trouble is logged, never allowed to
    /// block the listing itself.
    pub async fn list_tournaments(&self) -> AdminResult<Vec<Tournament>> {
        match self.lifecycle.reconcile_now().await {
            Ok(report) if !report.is_clean() => {
                log::warn!(
                    "Listing with {} unreconciled tournament(s)",
                    report.failures.len()
                );
            }
            Ok(_) => {}
            Err(error) => log::warn!("Reconciliation pass failed before listing: {error}"),
        }

        Ok(self.tournaments.list().await?)
    }

    /// Current wallet balance for a user (0 if never credited).
    pub async fn wallet_balance(&self, user_id: &str) -> AdminResult<i64> {
        Ok(self.ledger.get_balance(user_id).await?)
    }

    /// Recent ledger entries for a user, newest first.
    pub async fn wallet_entries(
        &self,
        user_id: &str,
        limit: usize,
    ) -> AdminResult<Vec<LedgerEntry>> {
        Ok(self.ledger.entries(user_id, limit).await?)
    }
}
