//! Tournament data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tournament ID type
pub type TournamentId = Uuid;

/// User ID type (opaque, assigned by the identity provider)
pub type UserId = String;

/// Tournament lifecycle status
///
/// Derived from the scheduled instant and the current time, except that an
/// operator may force `Completed` early. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    /// Registration open, scheduled instant not yet reached
    Upcoming,
    /// Match underway
    Live,
    /// Results final
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Upcoming => write!(f, "upcoming"),
            TournamentStatus::Live => write!(f, "live"),
            TournamentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Game category
///
/// Closed set of supported titles plus a free-text escape hatch. Serialized
/// as a plain string so documents stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameCategory {
    Pubg,
    DeadShot,
    EightBallPool,
    CallOfDuty,
    FreeFire,
    Other(String),
}

impl std::fmt::Display for GameCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCategory::Pubg => write!(f, "PUBG"),
            GameCategory::DeadShot => write!(f, "Dead Shot"),
            GameCategory::EightBallPool => write!(f, "8 Ball Pool"),
            GameCategory::CallOfDuty => write!(f, "Call of Duty"),
            GameCategory::FreeFire => write!(f, "Free Fire"),
            GameCategory::Other(name) => write!(f, "{name}"),
        }
    }
}

impl From<GameCategory> for String {
    fn from(category: GameCategory) -> Self {
        category.to_string()
    }
}

impl TryFrom<String> for GameCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "" => Err("game category must not be empty".to_string()),
            "PUBG" => Ok(GameCategory::Pubg),
            "Dead Shot" => Ok(GameCategory::DeadShot),
            "8 Ball Pool" => Ok(GameCategory::EightBallPool),
            "Call of Duty" => Ok(GameCategory::CallOfDuty),
            "Free Fire" => Ok(GameCategory::FreeFire),
            other => Ok(GameCategory::Other(other.to_string())),
        }
    }
}

impl GameCategory {
    /// Whether the category carries a usable name.
    pub fn is_empty(&self) -> bool {
        matches!(self, GameCategory::Other(name) if name.trim().is_empty())
    }
}

/// Tournament record
///
/// Currency amounts are integral minor units (paisa); the display layer owns
/// formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Opaque unique id, assigned at creation
    pub id: TournamentId,
    /// Game name shown in listings
    pub game_name: String,
    /// Game category
    pub category: GameCategory,
    /// Combined date + time the match starts
    pub scheduled_at: DateTime<Utc>,
    /// Entry fee in paisa
    pub entry_fee: i64,
    /// Prize pool in paisa
    pub prize_pool: i64,
    /// Roster capacity
    pub max_participants: u32,
    /// Joined user ids, unique, never more than `max_participants`
    pub participants: Vec<UserId>,
    /// Lifecycle status
    pub status: TournamentStatus,
    /// Match access details (room id, password, ...), may be empty
    pub match_details: String,
    /// Rules text, may be empty
    pub rules: String,
    /// Reference to the uploaded result image, absent until attached
    pub result_image: Option<String>,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Whether the roster is at capacity.
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }
}

/// Input for creating a tournament
///
/// `scheduled_at` arrives as an RFC 3339 string from the admin form and is
/// parsed during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDraft {
    pub game_name: String,
    pub category: GameCategory,
    pub scheduled_at: String,
    pub entry_fee: i64,
    pub prize_pool: i64,
    pub max_participants: u32,
    #[serde(default)]
    pub match_details: String,
    #[serde(default)]
    pub rules: String,
}

/// Partial update for a tournament
///
/// Every descriptive field and the status are updatable; the roster is not;
/// membership changes go through join/leave only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentPatch {
    pub game_name: Option<String>,
    pub category: Option<GameCategory>,
    pub scheduled_at: Option<String>,
    pub entry_fee: Option<i64>,
    pub prize_pool: Option<i64>,
    pub max_participants: Option<u32>,
    pub match_details: Option<String>,
    pub rules: Option<String>,
    pub status: Option<TournamentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_known_names() {
        for name in ["PUBG", "Dead Shot", "8 Ball Pool", "Call of Duty", "Free Fire"] {
            let category = GameCategory::try_from(name.to_string()).unwrap();
            assert_eq!(category.to_string(), name);
            assert!(!matches!(category, GameCategory::Other(_)));
        }
    }

    #[test]
    fn test_category_free_text_falls_through_to_other() {
        let category = GameCategory::try_from("Valorant".to_string()).unwrap();
        assert_eq!(category, GameCategory::Other("Valorant".to_string()));
    }

    #[test]
    fn test_category_rejects_empty() {
        assert!(GameCategory::try_from("".to_string()).is_err());
        assert!(GameCategory::try_from("   ".to_string()).is_err());
    }

    #[test]
    fn test_category_serializes_as_plain_string() {
        let json = serde_json::to_string(&GameCategory::EightBallPool).unwrap();
        assert_eq!(json, "\"8 Ball Pool\"");

        let back: GameCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GameCategory::EightBallPool);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TournamentStatus::Upcoming).unwrap(),
            "\"upcoming\""
        );
        assert_eq!(TournamentStatus::Live.to_string(), "live");
    }
}
