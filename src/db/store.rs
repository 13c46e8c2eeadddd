//! Document store port with optimistic versioning.
//!
//! This module provides the trait-based abstraction over document-oriented
//! persistence, enabling better testing through mock implementations and
//! dependency injection. The store is strongly consistent per document only;
//! there are no cross-document transactions, so every aggregate that must
//! change atomically lives in a single document.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Collection holding tournament documents.
pub const TOURNAMENTS: &str = "tournaments";

/// Collection holding wallet documents.
pub const WALLETS: &str = "wallets";

/// A stored document with its version counter.
///
/// Versions start at 1 and increase by exactly 1 on every write, which is
/// what makes compare-and-swap updates possible on top of plain upserts.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub version: u64,
    pub fields: Value,
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document field serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Version precondition failed (lost a concurrent race)
    #[error("Version conflict on {collection}/{id}")]
    VersionConflict { collection: String, id: String },

    /// Store unreachable or write rejected
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for document store operations
///
/// `upsert` takes an optional expected version:
///
/// * `None`: write unconditionally.
/// * `Some(0)`: the document must not exist yet (create-only).
/// * `Some(v)`: the stored version must be exactly `v` (compare-and-swap).
///
/// A failed precondition yields [`StoreError::VersionConflict`]; callers are
/// expected to re-read and retry a bounded number of times.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Fetch every document in a collection.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Write a document, enforcing the version precondition. Returns the new
    /// version.
    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
        expected: Option<u64>,
    ) -> StoreResult<u64>;

    /// Remove a document. Returns whether anything was removed.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;
}
