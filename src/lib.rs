//! # Arena Admin
//!
//! Core subsystem of an administrative console for paid multiplayer-game
//! tournaments: the tournament lifecycle and the user wallet ledger. The UI
//! and the media-upload pipeline are external collaborators; this crate owns
//! the rules that keep tournament rosters within capacity, lifecycle status
//! consistent with the schedule, and wallet balances immune to duplicated or
//! concurrent credits.
//!
//! ## Architecture
//!
//! - **Status evaluator**: a pure function mapping (schedule, now, current
//!   status) to upcoming / live / completed, with completed terminal
//! - **Ledger**: idempotent, atomic wallet credits
//! - **TournamentStore**: tournament records and roster membership
//! - **LifecycleService**: batch status reconciliation with per-record
//!   failure isolation
//! - **AdminOps**: the facade the UI layer calls
//!
//! All state lives behind the [`db::DocumentStore`] port (strongly
//! consistent per document); mutations are compare-and-swap writes with
//! bounded retries, so concurrent request handlers and the background
//! reconciliation trigger never corrupt shared records.
//!
//! ## Example
//!
//! ```no_run
//! use arena_admin::admin::AdminOps;
//! use arena_admin::db::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ops = AdminOps::new(Arc::new(MemoryStore::new()));
//!     let balance = ops.credit_user_wallet("user-1", 500, "topup-1").await?;
//!     assert_eq!(balance, 500);
//!     Ok(())
//! }
//! ```

/// Admin operations facade and boundary errors.
pub mod admin;
pub use admin::{AdminError, AdminOps, AdminResult};

/// Persistence port and implementations.
pub mod db;

/// Batch status reconciliation.
pub mod lifecycle;
pub use lifecycle::{LifecycleService, ReconcileReport};

/// Tournament records, roster membership and status evaluation.
pub mod tournament;

/// Wallet ledger.
pub mod wallet;
