//! # In-Memory Store
//!
//! `DocumentStore` over a locked map of collections. The serve path
//! uses the file-backed store; this one backs tests and the file
//! store's resident state.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::pipeline::{self, Stage};
use crate::query::QueryOptions;

use super::errors::{StoreError, StoreResult};
use super::{apply_patch, doc_id, project, run_query, stamp_new, DocumentStore};

/// Collection map behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with already-stamped documents (file store
    /// boot path).
    pub(crate) fn load_collection(&self, collection: &str, docs: Vec<Value>) -> StoreResult<()> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        data.insert(collection.to_string(), docs);
        Ok(())
    }

    /// Snapshot a collection's raw documents (file store flush path).
    pub(crate) fn snapshot(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.get(collection).cloned().unwrap_or_default())
    }
}

impl DocumentStore for MemoryStore {
    fn find_many(&self, collection: &str, options: &QueryOptions) -> StoreResult<Vec<Value>> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        let docs = data.get(collection).map(Vec::as_slice).unwrap_or_default();
        Ok(run_query(docs, options))
    }

    fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        let found = data
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| doc_id(d) == Some(id)))
            .map(|doc| project(doc, &None));
        Ok(found)
    }

    fn insert(&self, collection: &str, mut doc: Value) -> StoreResult<Value> {
        stamp_new(&mut doc);

        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        data.entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        Ok(project(&doc, &None))
    }

    fn insert_many(&self, collection: &str, docs: Vec<Value>) -> StoreResult<Vec<Value>> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let records = data.entry(collection.to_string()).or_default();

        let mut inserted = Vec::with_capacity(docs.len());
        for mut doc in docs {
            stamp_new(&mut doc);
            inserted.push(project(&doc, &None));
            records.push(doc);
        }

        Ok(inserted)
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> StoreResult<Option<Value>> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(records) = data.get_mut(collection) else {
            return Ok(None);
        };

        let Some(doc) = records.iter_mut().find(|d| doc_id(d) == Some(id)) else {
            return Ok(None);
        };

        apply_patch(doc, &patch);
        Ok(Some(project(doc, &None)))
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(records) = data.get_mut(collection) else {
            return Ok(false);
        };

        match records.iter().position(|d| doc_id(d) == Some(id)) {
            Some(idx) => {
                records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_many(&self, collection: &str) -> StoreResult<usize> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let count = data.get(collection).map(Vec::len).unwrap_or(0);
        data.insert(collection.to_string(), Vec::new());
        Ok(count)
    }

    fn aggregate(&self, collection: &str, stages: &[Stage]) -> StoreResult<Vec<Value>> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        let docs = data.get(collection).cloned().unwrap_or_default();
        Ok(pipeline::execute(docs, stages))
    }
}
