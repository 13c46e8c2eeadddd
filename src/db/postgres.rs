//! PostgreSQL-backed document store.

use super::store::{Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// `DocumentStore` keeping every collection in a single `documents` table.
///
/// Version preconditions are enforced inside single atomic statements
/// (`ON CONFLICT`, conditional `UPDATE .. RETURNING`) so concurrent writers
/// on the same document serialize without explicit locks.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Arc<PgPool>,
}

impl PgDocumentStore {
    /// Create a new store over an existing connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                version BIGINT NOT NULL,
                fields JSONB NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, version, fields FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| Document {
            id: r.get("id"),
            version: r.get::<i64, _>("version") as u64,
            fields: r.get("fields"),
        }))
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let rows = sqlx::query("SELECT id, version, fields FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Document {
                id: r.get("id"),
                version: r.get::<i64, _>("version") as u64,
                fields: r.get("fields"),
            })
            .collect())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
        expected: Option<u64>,
    ) -> StoreResult<u64> {
        let conflict = || StoreError::VersionConflict {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let row = match expected {
            // Unconditional write: insert or bump the version in place.
            None => sqlx::query(
                r#"
                INSERT INTO documents (collection, id, version, fields)
                VALUES ($1, $2, 1, $3)
                ON CONFLICT (collection, id)
                DO UPDATE SET version = documents.version + 1, fields = EXCLUDED.fields
                RETURNING version
                "#,
            )
            .bind(collection)
            .bind(id)
            .bind(&fields)
            .fetch_optional(self.pool.as_ref())
            .await?,

            // Create-only: the insert silently loses if the row exists.
            Some(0) => sqlx::query(
                r#"
                INSERT INTO documents (collection, id, version, fields)
                VALUES ($1, $2, 1, $3)
                ON CONFLICT (collection, id) DO NOTHING
                RETURNING version
                "#,
            )
            .bind(collection)
            .bind(id)
            .bind(&fields)
            .fetch_optional(self.pool.as_ref())
            .await?,

            // Compare-and-swap against the expected version.
            Some(expected) => sqlx::query(
                r#"
                UPDATE documents
                SET version = version + 1, fields = $4
                WHERE collection = $1 AND id = $2 AND version = $3
                RETURNING version
                "#,
            )
            .bind(collection)
            .bind(id)
            .bind(expected as i64)
            .bind(&fields)
            .fetch_optional(self.pool.as_ref())
            .await?,
        };

        let row = row.ok_or_else(conflict)?;
        Ok(row.get::<i64, _>("version") as u64)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
