//! Lifecycle reconciliation across all tournaments.
//!
//! Recomputes every tournament's status from its schedule and persists only
//! the records whose status actually changed. Invoked both on a recurring
//! schedule and synchronously before listing reads, so displayed status is
//! never staler than the last reconciliation attempt.

use crate::tournament::{TournamentError, TournamentId, TournamentResult, TournamentStore};
use chrono::{DateTime, Utc};

/// One record that could not be reconciled.
#[derive(Debug)]
pub struct ReconcileFailure {
    pub tournament_id: TournamentId,
    pub error: TournamentError,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Tournaments examined
    pub examined: usize,
    /// Tournaments whose status was corrected and persisted
    pub updated: usize,
    /// Per-record failures; these never abort the pass
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lifecycle service
///
/// Each record is read, evaluated and written independently; no lock is held
/// across the pass, and a pass cancelled mid-flight leaves already-persisted
/// records persisted. Re-running is always safe.
#[derive(Clone)]
pub struct LifecycleService {
    tournaments: TournamentStore,
}

impl LifecycleService {
    /// Create a new lifecycle service over a tournament store.
    pub fn new(tournaments: TournamentStore) -> Self {
        Self { tournaments }
    }

    /// Reconcile every tournament's status against `now`.
    ///
    /// Fails only if the initial listing is unavailable; individual records
    /// that cannot be written are collected into the report so one bad
    /// record never blocks the rest.
    pub async fn reconcile_all(&self, now: DateTime<Utc>) -> TournamentResult<ReconcileReport> {
        let tournaments = self.tournaments.list().await?;

        let mut report = ReconcileReport::default();
        for tournament in tournaments {
            report.examined += 1;
            match self.tournaments.refresh_status(tournament.id, now).await {
                Ok(Some(status)) => {
                    report.updated += 1;
                    log::info!("Tournament {} reconciled to {status}", tournament.id);
                }
                Ok(None) => {}
                // Deleted between the listing and the refresh; nothing to fix.
                Err(TournamentError::NotFound(_)) => {}
                Err(error) => {
                    log::warn!(
                        "Failed to reconcile tournament {}: {error}",
                        tournament.id
                    );
                    report.failures.push(ReconcileFailure {
                        tournament_id: tournament.id,
                        error,
                    });
                }
            }
        }

        log::debug!(
            "Reconciliation pass: {} examined, {} updated, {} failed",
            report.examined,
            report.updated,
            report.failures.len()
        );
        Ok(report)
    }

    /// Reconcile against the wall clock.
    pub async fn reconcile_now(&self) -> TournamentResult<ReconcileReport> {
        self.reconcile_all(Utc::now()).await
    }

    /// Spawn the recurring background trigger.
    ///
    /// Aborting the returned handle may cancel a pass mid-flight; records
    /// already persisted stay persisted and the next pass picks up the rest.
    pub fn spawn_periodic(self, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = self.reconcile_now().await {
                    log::error!("Scheduled reconciliation pass failed: {error}");
                }
            }
        })
    }
}
