use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    store::KeyValueStore,
};

/// Process-local backend. An optional byte quota mimics the size limit a
/// browser places on local storage.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> AppError {
    AppError::Storage(format!("store lock poisoned: {}", err))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(AppError::Storage(format!(
                    "quota exceeded writing '{}': {} of {} bytes",
                    key, needed, quota
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_clear() {
        let store = MemoryStore::new();
        store.set("k", "\"v\"").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("\"v\""));

        store.clear("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn quota_rejects_oversized_writes_and_keeps_old_value() {
        let store = MemoryStore::with_quota(16);
        store.set("k", "small").await.unwrap();

        let err = store.set("k", "this value is far too large").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("small"));
    }
}
