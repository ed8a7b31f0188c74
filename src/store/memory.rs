// src/store/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Collection, Document, DocumentStore, Filter, StoreError, UpdateOutcome, ID_FIELD};

/// Process-local store for development runs and tests. Documents are kept
/// in insertion order and ids are allocated from a single counter.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    collections: HashMap<Collection, Vec<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: Collection, mut body: Map<String, Value>) -> Result<i64, StoreError> {
        body.remove(ID_FIELD);
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.collections.entry(collection).or_default().push(Document { id, body });
        Ok(id)
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
        value: Value,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let target = inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));

        Ok(match target {
            None => UpdateOutcome { matched: 0, modified: 0 },
            Some(doc) if doc.body.get(field) == Some(&value) => UpdateOutcome { matched: 1, modified: 0 },
            Some(doc) => {
                doc.body.insert(field.to_string(), value);
                UpdateOutcome { matched: 1, modified: 1 }
            }
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(docs) = inner.collections.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
