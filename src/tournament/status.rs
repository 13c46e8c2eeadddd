//! Pure status evaluation.
//!
//! Single authority for the lifecycle transition rule: manual edits and
//! scheduled reconciliation both go through [`evaluate`], so there is exactly
//! one place that decides what a tournament's status should be.

use super::models::TournamentStatus;
use chrono::{DateTime, Utc};

/// Compute the lifecycle status for a tournament.
///
/// `Completed` is terminal and never regresses. Otherwise a tournament is
/// `Upcoming` strictly before its scheduled instant and `Live` from that
/// instant on; there is no automatic end-of-match transition since match
/// duration is not tracked.
pub fn evaluate(
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
    current: TournamentStatus,
) -> TournamentStatus {
    if current == TournamentStatus::Completed {
        TournamentStatus::Completed
    } else if now < scheduled_at {
        TournamentStatus::Upcoming
    } else {
        TournamentStatus::Live
    }
}
