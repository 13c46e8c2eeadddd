//! Persistence layer: the document store port and its implementations.
//!
//! Tournament and wallet state live in a document-oriented store that is
//! strongly consistent per document. This module provides:
//! - [`DocumentStore`]: the port the rest of the crate is written against
//! - [`PgDocumentStore`]: PostgreSQL implementation (sqlx)
//! - [`MemoryStore`]: in-memory implementation for tests and embedding
//! - [`Database`]/[`DatabaseConfig`]: connection pool plumbing
//!
//! ## Example
//!
//! ```no_run
//! use arena_admin::db::{Database, DatabaseConfig, PgDocumentStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let store = PgDocumentStore::new(Arc::new(db.pool().clone()));
//!     store.ensure_schema().await?;
//!     Ok(())
//! }
//! ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;
pub mod memory;
pub mod postgres;
pub mod store;

pub use config::DatabaseConfig;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use store::{Document, DocumentStore, StoreError, StoreResult, TOURNAMENTS, WALLETS};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Returns
    ///
    /// * `Result<Database, sqlx::Error>` - Database instance or error
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
