//! In-memory document store for tests and embedding.

use super::store::{Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// `DocumentStore` backed by a process-local map.
///
/// Used by the test suite and for running the subsystem without a database.
/// Write failures can be injected per document via [`MemoryStore::fail_writes`]
/// so partial-failure paths (reconciliation) are exercisable.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, HashMap<String, (u64, Value)>>>>,
    failing: Arc<Mutex<HashSet<(String, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upsert of `collection/id` fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_writes(&self, collection: &str, id: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert((collection.to_string(), id.to_string()));
    }

    /// Clear an injected write failure.
    pub fn heal_writes(&self, collection: &str, id: &str) {
        self.failing
            .lock()
            .unwrap()
            .remove(&(collection.to_string(), id.to_string()));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).and_then(|docs| {
            docs.get(id).map(|(version, fields)| Document {
                id: id.to_string(),
                version: *version,
                fields: fields.clone(),
            })
        }))
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, (version, fields))| Document {
                        id: id.clone(),
                        version: *version,
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
        expected: Option<u64>,
    ) -> StoreResult<u64> {
        if self
            .failing
            .lock()
            .unwrap()
            .contains(&(collection.to_string(), id.to_string()))
        {
            return Err(StoreError::Unavailable(format!(
                "injected write failure for {collection}/{id}"
            )));
        }

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        let current = docs.get(id).map(|(version, _)| *version).unwrap_or(0);

        if let Some(expected) = expected
            && expected != current
        {
            return Err(StoreError::VersionConflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let next = current + 1;
        docs.insert(id.to_string(), (next, fields));
        Ok(next)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.lock().unwrap();
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }
}
