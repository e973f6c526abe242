use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, FieldUpdates, StoreError, WriteBatch, WriteOp};

type Collection = BTreeMap<String, Value>;

/// Process-local document store. One lock around all collections keeps
/// batch commits atomic relative to readers; critical sections never hold
/// the lock across an await point.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lookup_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn set_path(data: &mut Value, path: &str, value: Value) {
    if !data.is_object() {
        *data = Value::Object(serde_json::Map::new());
    }
    let Value::Object(map) = data else { return };
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            set_path(child, rest, value);
        }
    }
}

fn matches(data: &Value, filters: &[(&str, Value)]) -> bool {
    filters
        .iter()
        .all(|(path, expected)| lookup_path(data, path) == Some(expected))
}

fn apply_updates(doc: &mut Value, fields: &FieldUpdates) {
    for (path, value) in fields.iter() {
        set_path(doc, path, value.clone());
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|coll| coll.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|coll| {
                coll.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|coll| {
                coll.iter()
                    .filter(|(_, data)| matches(data, filters))
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, data: Value) -> Result<Document, StoreError> {
        if !data.is_object() {
            return Err(StoreError::Backend(
                "document payload must be a JSON object".into(),
            ));
        }
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data.clone());
        Ok(Document { id, data })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: FieldUpdates,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(collection)
            .and_then(|coll| coll.get_mut(id))
            .ok_or_else(|| StoreError::Missing {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        apply_updates(doc, &fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        if let Some(coll) = collections.get_mut(collection) {
            coll.remove(id);
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.collections.write();

        // Validate every op against current state before touching anything,
        // so a failing batch leaves no partial writes behind.
        for op in &batch.ops {
            if let WriteOp::Update { collection, id, .. } = op {
                let exists = collections
                    .get(collection)
                    .map(|coll| coll.contains_key(id))
                    .unwrap_or(false);
                if !exists {
                    return Err(StoreError::Missing {
                        collection: collection.clone(),
                        id: id.clone(),
                    });
                }
            }
        }

        for op in batch.ops {
            match op {
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    if let Some(doc) = collections
                        .get_mut(&collection)
                        .and_then(|coll| coll.get_mut(&id))
                    {
                        apply_updates(doc, &fields);
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(coll) = collections.get_mut(&collection) {
                        coll.remove(&id);
                    }
                }
            }
        }
        Ok(())
    }
}
