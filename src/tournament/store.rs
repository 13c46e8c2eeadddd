//! Tournament store: creation, updates, roster membership, result artifacts.

use super::models::{
    Tournament, TournamentDraft, TournamentId, TournamentPatch, TournamentStatus, UserId,
};
use super::status;
use crate::db::{Document, DocumentStore, StoreError, TOURNAMENTS};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Retries allowed for lost CAS races before a conflict surfaces.
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Tournament is full")]
    Full,

    #[error("User already joined")]
    AlreadyJoined,

    #[error("User has not joined")]
    NotJoined,

    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Concurrent update conflict on tournament {0}")]
    Conflict(TournamentId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Tournament store
///
/// Owns every tournament document. All mutations re-read current state and
/// write back with a compare-and-swap, so concurrent operators and the
/// reconciliation pass serialize per tournament without lost updates.
#[derive(Clone)]
pub struct TournamentStore {
    store: Arc<dyn DocumentStore>,
}

impl TournamentStore {
    /// Create a new tournament store over a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a new tournament from an admin draft.
    ///
    /// Validates the draft, assigns a fresh id, starts with an empty roster
    /// and a status evaluated against "now".
    pub async fn create(&self, draft: TournamentDraft) -> TournamentResult<Tournament> {
        let scheduled_at = parse_schedule(&draft.scheduled_at)?;
        validate_name(&draft.game_name)?;
        validate_category(&draft)?;
        validate_amounts(draft.entry_fee, draft.prize_pool)?;
        validate_capacity(draft.max_participants)?;

        let now = Utc::now();
        let tournament = Tournament {
            id: Uuid::new_v4(),
            game_name: draft.game_name.trim().to_string(),
            category: draft.category,
            scheduled_at,
            entry_fee: draft.entry_fee,
            prize_pool: draft.prize_pool,
            max_participants: draft.max_participants,
            participants: Vec::new(),
            status: status::evaluate(scheduled_at, now, TournamentStatus::Upcoming),
            match_details: draft.match_details,
            rules: draft.rules,
            result_image: None,
            created_at: now,
            updated_at: now,
        };

        let fields = serde_json::to_value(&tournament)?;
        self.store
            .upsert(TOURNAMENTS, &tournament.id.to_string(), fields, Some(0))
            .await?;

        log::info!(
            "Created tournament {} ({}, scheduled {})",
            tournament.id,
            tournament.game_name,
            tournament.scheduled_at
        );
        Ok(tournament)
    }

    /// Fetch a single tournament.
    pub async fn get(&self, id: TournamentId) -> TournamentResult<Tournament> {
        Ok(self.load(id).await?.0)
    }

    /// List all tournaments, newest first (display ordering).
    pub async fn list(&self) -> TournamentResult<Vec<Tournament>> {
        let docs = self.store.list(TOURNAMENTS).await?;
        let mut tournaments = docs
            .into_iter()
            .map(|doc| decode(&doc).map(|(t, _)| t))
            .collect::<TournamentResult<Vec<_>>>()?;
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tournaments)
    }

    /// Apply a partial update to descriptive fields and/or status.
    ///
    /// The roster is never touched through this path; membership changes go
    /// through [`TournamentStore::join`]/[`TournamentStore::leave`].
    pub async fn update(
        &self,
        id: TournamentId,
        patch: TournamentPatch,
    ) -> TournamentResult<Tournament> {
        let scheduled_at = patch
            .scheduled_at
            .as_deref()
            .map(parse_schedule)
            .transpose()?;
        if let Some(game_name) = &patch.game_name {
            validate_name(game_name)?;
        }
        if let Some(category) = &patch.category
            && category.is_empty()
        {
            return Err(TournamentError::Validation(
                "game category must not be empty".to_string(),
            ));
        }
        validate_amounts(
            patch.entry_fee.unwrap_or(0),
            patch.prize_pool.unwrap_or(0),
        )?;
        if let Some(max) = patch.max_participants {
            validate_capacity(max)?;
        }

        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (mut tournament, version) = self.load(id).await?;

            if let Some(game_name) = &patch.game_name {
                tournament.game_name = game_name.trim().to_string();
            }
            if let Some(category) = &patch.category {
                tournament.category = category.clone();
            }
            if let Some(scheduled_at) = scheduled_at {
                tournament.scheduled_at = scheduled_at;
            }
            if let Some(entry_fee) = patch.entry_fee {
                tournament.entry_fee = entry_fee;
            }
            if let Some(prize_pool) = patch.prize_pool {
                tournament.prize_pool = prize_pool;
            }
            if let Some(max) = patch.max_participants {
                if (tournament.participants.len() as u32) > max {
                    return Err(TournamentError::Validation(format!(
                        "maximum participants {} is below the current roster of {}",
                        max,
                        tournament.participants.len()
                    )));
                }
                tournament.max_participants = max;
            }
            if let Some(match_details) = &patch.match_details {
                tournament.match_details = match_details.clone();
            }
            if let Some(rules) = &patch.rules {
                tournament.rules = rules.clone();
            }
            if let Some(new_status) = patch.status {
                tournament.status = new_status;
            }
            tournament.updated_at = Utc::now();

            match self.write(&tournament, version).await {
                Ok(()) => return Ok(tournament),
                Err(TournamentError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::Conflict(id))
    }

    /// Attach (or replace) the result image reference.
    ///
    /// Idempotent: a new reference overwrites the prior one.
    pub async fn attach_result(
        &self,
        id: TournamentId,
        result_ref: String,
    ) -> TournamentResult<Tournament> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (mut tournament, version) = self.load(id).await?;
            tournament.result_image = Some(result_ref.clone());
            tournament.updated_at = Utc::now();

            match self.write(&tournament, version).await {
                Ok(()) => {
                    log::info!("Attached result image to tournament {id}");
                    return Ok(tournament);
                }
                Err(TournamentError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::Conflict(id))
    }

    /// Delete a tournament. No cascading side effects.
    pub async fn delete(&self, id: TournamentId) -> TournamentResult<()> {
        let deleted = self.store.delete(TOURNAMENTS, &id.to_string()).await?;
        if !deleted {
            return Err(TournamentError::NotFound(id));
        }
        log::info!("Deleted tournament {id}");
        Ok(())
    }

    /// Add a user to the roster.
    ///
    /// Capacity and uniqueness are enforced here, never at call sites.
    /// Registration is only open while the tournament is `Upcoming`.
    pub async fn join(&self, id: TournamentId, user_id: &UserId) -> TournamentResult<Tournament> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (mut tournament, version) = self.load(id).await?;

            if tournament.status != TournamentStatus::Upcoming {
                return Err(TournamentError::RegistrationClosed);
            }
            if tournament.participants.contains(user_id) {
                return Err(TournamentError::AlreadyJoined);
            }
            if tournament.is_full() {
                return Err(TournamentError::Full);
            }

            tournament.participants.push(user_id.clone());
            tournament.updated_at = Utc::now();

            match self.write(&tournament, version).await {
                Ok(()) => return Ok(tournament),
                Err(TournamentError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::Conflict(id))
    }

    /// Remove a user from the roster while registration is open.
    pub async fn leave(&self, id: TournamentId, user_id: &UserId) -> TournamentResult<Tournament> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (mut tournament, version) = self.load(id).await?;

            if tournament.status != TournamentStatus::Upcoming {
                return Err(TournamentError::RegistrationClosed);
            }
            let Some(position) = tournament.participants.iter().position(|p| p == user_id)
            else {
                return Err(TournamentError::NotJoined);
            };

            tournament.participants.remove(position);
            tournament.updated_at = Utc::now();

            match self.write(&tournament, version).await {
                Ok(()) => return Ok(tournament),
                Err(TournamentError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::Conflict(id))
    }

    /// Re-evaluate a single tournament's status against `now`.
    ///
    /// Writes only when the evaluated status differs from the stored one, so
    /// an unchanged record keeps its `updated_at`. Returns the new status if
    /// a write happened.
    pub async fn refresh_status(
        &self,
        id: TournamentId,
        now: DateTime<Utc>,
    ) -> TournamentResult<Option<TournamentStatus>> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let (mut tournament, version) = self.load(id).await?;

            let next = status::evaluate(tournament.scheduled_at, now, tournament.status);
            if next == tournament.status {
                return Ok(None);
            }

            tournament.status = next;
            tournament.updated_at = now;

            match self.write(&tournament, version).await {
                Ok(()) => {
                    log::debug!("Tournament {id} transitioned to {next}");
                    return Ok(Some(next));
                }
                Err(TournamentError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TournamentError::Conflict(id))
    }

    async fn load(&self, id: TournamentId) -> TournamentResult<(Tournament, u64)> {
        let doc = self
            .store
            .get(TOURNAMENTS, &id.to_string())
            .await?
            .ok_or(TournamentError::NotFound(id))?;
        decode(&doc)
    }

    async fn write(&self, tournament: &Tournament, version: u64) -> TournamentResult<()> {
        let fields = serde_json::to_value(tournament)?;
        self.store
            .upsert(TOURNAMENTS, &tournament.id.to_string(), fields, Some(version))
            .await?;
        Ok(())
    }
}

fn decode(doc: &Document) -> TournamentResult<(Tournament, u64)> {
    let tournament: Tournament = serde_json::from_value(doc.fields.clone())?;
    Ok((tournament, doc.version))
}

fn parse_schedule(raw: &str) -> TournamentResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            TournamentError::Validation(format!("scheduled instant {raw:?} is not parseable: {e}"))
        })
}

fn validate_name(game_name: &str) -> TournamentResult<()> {
    if game_name.trim().is_empty() {
        return Err(TournamentError::Validation(
            "game name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_category(draft: &TournamentDraft) -> TournamentResult<()> {
    if draft.category.is_empty() {
        return Err(TournamentError::Validation(
            "game category must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_amounts(entry_fee: i64, prize_pool: i64) -> TournamentResult<()> {
    if entry_fee < 0 {
        return Err(TournamentError::Validation(format!(
            "entry fee must be non-negative, got {entry_fee}"
        )));
    }
    if prize_pool < 0 {
        return Err(TournamentError::Validation(format!(
            "prize pool must be non-negative, got {prize_pool}"
        )));
    }
    Ok(())
}

fn validate_capacity(max_participants: u32) -> TournamentResult<()> {
    if max_participants == 0 {
        return Err(TournamentError::Validation(
            "maximum participants must be at least 1".to_string(),
        ));
    }
    Ok(())
}
