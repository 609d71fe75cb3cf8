//! Persistent key-value storage.
//!
//! Backends only move strings around; [`Storage`] layers JSON encoding and the
//! versioned collection envelope on top of whichever backend is injected.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// Newest collection layout this crate writes and understands.
pub const SCHEMA_VERSION: u32 = 1;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn clear(&self, key: &str) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    items: &'a [T],
}

#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Returns `None` for a missing key or a stored JSON `null`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str::<Option<T>>(&raw).map_err(|e| AppError::corrupted(key, e))
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Failed to encode '{}': {}", key, e)))?;
        self.backend.set(key, &raw).await
    }

    pub async fn clear(&self, key: &str) -> Result<()> {
        self.backend.clear(key).await
    }

    pub async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.backend.get(key).await?.is_some())
    }

    /// Reads a collection document. Accepts the current envelope as well as the
    /// bare-array layout written before envelopes existed.
    pub async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        let document: Value = serde_json::from_str(&raw).map_err(|e| AppError::corrupted(key, e))?;
        decode_collection(key, document)
    }

    pub async fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.set(key, &EnvelopeRef { schema_version: SCHEMA_VERSION, items }).await
    }
}

fn decode_collection<T: DeserializeOwned>(key: &str, document: Value) -> Result<Option<Vec<T>>> {
    let items = match document {
        Value::Null => return Ok(None),
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            let version = map
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .ok_or_else(|| AppError::corrupted(key, "missing schemaVersion"))?;
            if version > u64::from(SCHEMA_VERSION) {
                return Err(AppError::UnsupportedSchema {
                    key: key.to_string(),
                    version,
                });
            }
            map.remove("items").unwrap_or_else(|| Value::Array(Vec::new()))
        }
        other => {
            return Err(AppError::corrupted(key, format!("expected a collection, found {}", other)));
        }
    };

    serde_json::from_value(items)
        .map(Some)
        .map_err(|e| AppError::corrupted(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[tokio::test]
    async fn missing_key_is_absent_not_an_error() {
        let storage = Storage::in_memory();
        assert!(storage.get::<Row>("nothing").await.unwrap().is_none());
        assert!(storage.load_collection::<Row>("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn collections_are_written_as_envelopes() {
        let backend = Arc::new(MemoryStore::new());
        let storage = Storage::new(backend.clone());
        storage
            .save_collection("rows", &[Row { id: "1".into() }])
            .await
            .unwrap();

        let raw = backend.get("rows").await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["items"][0]["id"], "1");
    }

    #[tokio::test]
    async fn legacy_bare_arrays_are_accepted() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("rows", r#"[{"id":"7"}]"#).await.unwrap();
        let storage = Storage::new(backend);

        let rows: Vec<Row> = storage.load_collection("rows").await.unwrap().unwrap();
        assert_eq!(rows, vec![Row { id: "7".into() }]);
    }

    #[tokio::test]
    async fn unparseable_documents_are_corrupted_state() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("rows", "{not json").await.unwrap();
        let storage = Storage::new(backend);

        let err = storage.load_collection::<Row>("rows").await.unwrap_err();
        assert!(err.is_corrupted());
    }

    #[tokio::test]
    async fn newer_schema_versions_are_refused() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set("rows", r#"{"schemaVersion":99,"items":[]}"#)
            .await
            .unwrap();
        let storage = Storage::new(backend);

        let err = storage.load_collection::<Row>("rows").await.unwrap_err();
        assert!(!err.is_corrupted());
        assert!(matches!(err, AppError::UnsupportedSchema { ref key, version: 99 } if key == "rows"));
    }
}
