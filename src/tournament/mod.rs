//! Tournament module: records, lifecycle status and roster membership.
//!
//! This module provides:
//! - Tournament creation, updates and deletion
//! - Roster membership with capacity enforcement
//! - Result image attachment
//! - The pure status evaluator (upcoming / live / completed)
//!
//! ## Example
//!
//! ```no_run
//! use arena_admin::db::MemoryStore;
//! use arena_admin::tournament::{GameCategory, TournamentDraft, TournamentStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = TournamentStore::new(Arc::new(MemoryStore::new()));
//!
//!     let tournament = store
//!         .create(TournamentDraft {
//!             game_name: "Friday Night Squads".to_string(),
//!             category: GameCategory::Pubg,
//!             scheduled_at: "2025-06-01T18:00:00Z".to_string(),
//!             entry_fee: 5000,
//!             prize_pool: 400_000,
//!             max_participants: 100,
//!             match_details: String::new(),
//!             rules: String::new(),
//!         })
//!         .await?;
//!     println!("Created tournament: {}", tournament.id);
//!
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod status;
pub mod store;

pub use models::{
    GameCategory, Tournament, TournamentDraft, TournamentId, TournamentPatch, TournamentStatus,
    UserId,
};
pub use store::{TournamentError, TournamentResult, TournamentStore};
