//! # Document Store
//!
//! Storage abstraction for JSON document collections: an explicit
//! trait with one method per operation, executed by an in-memory
//! store or a JSON-file-backed store. All query logic (filter, sort,
//! pagination, projection) lives here behind `find_many`; aggregation
//! delegates to the pipeline module.

mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::pipeline::Stage;
use crate::query::QueryOptions;

/// Identity field assigned at insert.
pub const ID_FIELD: &str = "id";

/// Creation timestamp assigned at insert; default list sort key.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Internal version counter, bumped on update, never returned.
pub const REV_FIELD: &str = "__rev";

/// Collection operations over JSON documents.
///
/// Implementations are synchronous and internally locked; handlers
/// call them directly.
pub trait DocumentStore: Send + Sync {
    /// List documents matching the query directive set.
    fn find_many(&self, collection: &str, options: &QueryOptions) -> StoreResult<Vec<Value>>;

    /// Fetch a single document by identity, or `None`.
    fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Insert one document; assigns `id`, `createdAt` and the internal
    /// revision. Returns the stored document as a client would see it.
    fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value>;

    /// Insert a batch of documents.
    fn insert_many(&self, collection: &str, docs: Vec<Value>) -> StoreResult<Vec<Value>>;

    /// Shallow-merge a patch into the identified document and bump its
    /// revision. Returns the updated document, or `None` if absent.
    fn update_by_id(&self, collection: &str, id: &str, patch: Value)
        -> StoreResult<Option<Value>>;

    /// Delete by identity. Returns whether a document was removed.
    fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Delete every document in the collection. Returns the count.
    fn delete_many(&self, collection: &str) -> StoreResult<usize>;

    /// Run an aggregation pipeline over the whole collection.
    fn aggregate(&self, collection: &str, stages: &[Stage]) -> StoreResult<Vec<Value>>;
}

/// Stamp identity, creation time and revision onto a new document.
pub(crate) fn stamp_new(doc: &mut Value) {
    if let Some(obj) = doc.as_object_mut() {
        obj.entry(ID_FIELD.to_string())
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        obj.entry(CREATED_AT_FIELD.to_string())
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        obj.insert(REV_FIELD.to_string(), Value::Number(0.into()));
    }
}

/// Shallow-merge a patch object into a document and bump its revision.
pub(crate) fn apply_patch(doc: &mut Value, patch: &Value) {
    let (Some(obj), Some(patch_obj)) = (doc.as_object_mut(), patch.as_object()) else {
        return;
    };

    for (key, value) in patch_obj {
        // Identity and internal fields are not patchable.
        if key == ID_FIELD || key == REV_FIELD || key == CREATED_AT_FIELD {
            continue;
        }
        obj.insert(key.clone(), value.clone());
    }

    let rev = obj.get(REV_FIELD).and_then(Value::as_u64).unwrap_or(0);
    obj.insert(REV_FIELD.to_string(), Value::Number((rev + 1).into()));
}

/// Extract a document's identity.
pub(crate) fn doc_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Shape one document for a client: apply the projection, or strip the
/// internal revision when no projection was requested. The revision
/// field is excluded even when explicitly selected.
pub(crate) fn project(doc: &Value, fields: &Option<Vec<String>>) -> Value {
    match fields {
        Some(keep) => {
            let projected: Map<String, Value> = keep
                .iter()
                .filter(|field| field.as_str() != REV_FIELD)
                .filter_map(|field| doc.get(field).map(|v| (field.clone(), v.clone())))
                .collect();
            Value::Object(projected)
        }
        None => {
            let mut out = doc.clone();
            if let Some(obj) = out.as_object_mut() {
                obj.remove(REV_FIELD);
            }
            out
        }
    }
}

/// Execute the full query directive set over a collection snapshot:
/// filter, sort, paginate, then project.
pub(crate) fn run_query(docs: &[Value], options: &QueryOptions) -> Vec<Value> {
    let mut matched: Vec<Value> = docs
        .iter()
        .filter(|d| options.filter.matches(d))
        .cloned()
        .collect();

    crate::query::sort_documents(&mut matched, &options.sort);

    matched
        .into_iter()
        .skip(options.skip())
        .take(options.limit)
        .map(|doc| project(&doc, &options.fields))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stamp_new_assigns_identity_and_revision() {
        let mut doc = json!({"name": "Forest Hiker"});
        stamp_new(&mut doc);

        assert!(doc[ID_FIELD].is_string());
        assert!(doc[CREATED_AT_FIELD].is_string());
        assert_eq!(doc[REV_FIELD], json!(0));
    }

    #[test]
    fn test_apply_patch_preserves_identity() {
        let mut doc = json!({"id": "t1", "createdAt": "2030-01-01T00:00:00Z", "__rev": 0, "price": 100});
        apply_patch(&mut doc, &json!({"price": 200, "id": "hijacked", "__rev": 99}));

        assert_eq!(doc["id"], json!("t1"));
        assert_eq!(doc["price"], json!(200));
        assert_eq!(doc["__rev"], json!(1));
    }

    #[test]
    fn test_project_strips_revision_by_default() {
        let doc = json!({"id": "t1", "__rev": 3, "name": "x"});
        let shaped = project(&doc, &None);

        assert!(shaped.get(REV_FIELD).is_none());
        assert_eq!(shaped["name"], json!("x"));
    }

    #[test]
    fn test_project_excludes_revision_even_when_requested() {
        let doc = json!({"id": "t1", "__rev": 3, "name": "x"});
        let shaped = project(
            &doc,
            &Some(vec!["name".to_string(), "__rev".to_string(), "id".to_string()]),
        );

        assert!(shaped.get(REV_FIELD).is_none());
        assert_eq!(shaped["name"], json!("x"));
        assert_eq!(shaped["id"], json!("t1"));
    }

    #[test]
    fn test_project_keeps_exactly_requested_fields() {
        let doc = json!({"id": "t1", "__rev": 3, "name": "x", "price": 9, "summary": "s"});
        let shaped = project(
            &doc,
            &Some(vec!["name".to_string(), "price".to_string(), "id".to_string()]),
        );

        let obj = shaped.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["id", "name", "price"]);
    }
}
