use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

mod memory;

pub use memory::MemoryStore;

/// A single document: store-assigned id plus a JSON object payload.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Wire form: the payload with the id spliced in, `{ "id": ..., ...data }`.
    pub fn to_json(&self) -> Value {
        let mut obj = match &self.data {
            Value::Object(map) => map.clone(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".into(), other.clone());
                map
            }
        };
        obj.insert("id".into(), Value::String(self.id.clone()));
        Value::Object(obj)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| StoreError::Backend(format!("malformed document {}: {}", self.id, e)))
    }
}

/// Partial-update set. Keys may be dotted paths into nested objects
/// (`autor.nombre`); intermediate objects are created when missing.
#[derive(Debug, Clone, Default)]
pub struct FieldUpdates {
    fields: Vec<(String, Value)>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((path.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.fields.iter()
    }
}

/// Writes collected first, committed together. Applied atomically relative
/// to readers: a failed commit leaves no partial state behind.
#[derive(Debug, Default)]
pub struct WriteBatch {
    pub(crate) ops: Vec<WriteOp>,
}

#[derive(Debug)]
pub(crate) enum WriteOp {
    Update {
        collection: String,
        id: String,
        fields: FieldUpdates,
    },
    Delete {
        collection: String,
        id: String,
    },
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, collection: &str, id: &str, fields: FieldUpdates) {
        self.ops.push(WriteOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
    }

    pub fn delete(&mut self, collection: &str, id: &str) {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no document to update: {collection}/{id}")]
    Missing { collection: String, id: String },
    #[error("{0}")]
    Backend(String),
}

/// Document-collection persistence seam. The service only assumes these
/// semantics: equality queries, partial updates by dotted path, and an
/// atomic multi-write batch.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Field-equality conjunction. Field names may be dotted paths.
    /// Values are compared as JSON values, no coercion.
    async fn query_eq(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Document>, StoreError>;

    /// Persists a new document under a fresh id and returns it.
    async fn add(&self, collection: &str, data: Value) -> Result<Document, StoreError>;

    /// Partial update. Fails with [`StoreError::Missing`] when the document
    /// does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: FieldUpdates,
    ) -> Result<(), StoreError>;

    /// Deleting an absent id is a no-op.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
