//! Wallet module providing the user-balance ledger.
//!
//! This module implements:
//! - Idempotency keys to prevent duplicate credits
//! - Atomic balance + timestamp + audit-entry writes (one document)
//! - Lazily materialized wallets (a user always logically has one)
//! - Per-user serialization via optimistic versioning
//!
//! ## Example
//!
//! ```no_run
//! use arena_admin::db::MemoryStore;
//! use arena_admin::wallet::{EntryReason, Ledger};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = Ledger::new(Arc::new(MemoryStore::new()));
//!
//!     let balance = ledger
//!         .credit("user-1", 500, "topup_2025_06_01", EntryReason::AdminCredit)
//!         .await?;
//!     println!("New balance: {balance}");
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ledger;
pub mod models;

pub use errors::{WalletError, WalletResult};
pub use ledger::Ledger;
pub use models::{EntryReason, LedgerEntry, Wallet};
