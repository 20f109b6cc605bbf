//! # File-Backed Store
//!
//! Persistence for the document store: one JSON array per collection
//! under a data directory, loaded at open and rewritten after each
//! mutation. Reads are served from the resident in-memory state.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::pipeline::Stage;
use crate::query::QueryOptions;

use super::errors::{StoreError, StoreResult};
use super::{DocumentStore, MemoryStore};

/// JSON-file-backed document store.
pub struct FileStore {
    dir: PathBuf,
    resident: MemoryStore,
}

impl FileStore {
    /// Open a data directory, creating it if needed, and load every
    /// `<collection>.json` file found there.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;

        let store = Self {
            dir: dir.to_path_buf(),
            resident: MemoryStore::new(),
        };

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(collection) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let docs = read_collection_file(&path)?;
            store.resident.load_collection(collection, docs)?;
        }

        Ok(store)
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    /// Rewrite one collection file from resident state.
    fn flush(&self, collection: &str) -> StoreResult<()> {
        let docs = self.resident.snapshot(collection)?;
        let body = serde_json::to_string_pretty(&Value::Array(docs))?;
        fs::write(self.collection_path(collection), body)?;
        Ok(())
    }
}

fn read_collection_file(path: &Path) -> StoreResult<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content)
        .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))?;

    match parsed {
        Value::Array(docs) => Ok(docs),
        _ => Err(StoreError::corrupt(
            path.display().to_string(),
            "expected a top-level JSON array",
        )),
    }
}

impl DocumentStore for FileStore {
    fn find_many(&self, collection: &str, options: &QueryOptions) -> StoreResult<Vec<Value>> {
        self.resident.find_many(collection, options)
    }

    fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.resident.find_by_id(collection, id)
    }

    fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value> {
        let inserted = self.resident.insert(collection, doc)?;
        self.flush(collection)?;
        Ok(inserted)
    }

    fn insert_many(&self, collection: &str, docs: Vec<Value>) -> StoreResult<Vec<Value>> {
        let inserted = self.resident.insert_many(collection, docs)?;
        self.flush(collection)?;
        Ok(inserted)
    }

    fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> StoreResult<Option<Value>> {
        let updated = self.resident.update_by_id(collection, id, patch)?;
        if updated.is_some() {
            self.flush(collection)?;
        }
        Ok(updated)
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let deleted = self.resident.delete_by_id(collection, id)?;
        if deleted {
            self.flush(collection)?;
        }
        Ok(deleted)
    }

    fn delete_many(&self, collection: &str) -> StoreResult<usize> {
        let count = self.resident.delete_many(collection)?;
        self.flush(collection)?;
        Ok(count)
    }

    fn aggregate(&self, collection: &str, stages: &[Stage]) -> StoreResult<Vec<Value>> {
        self.resident.aggregate(collection, stages)
    }
}
