use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{AppError, Result},
    store::Storage,
};

/// A record type persisted as one whole collection under a fixed key.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KEY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Collection written on first run and when the stored one is unreadable.
    fn defaults() -> Vec<Self>;
}

/// Read-all / transform / write-all access to one collection.
pub struct Collection<T> {
    storage: Storage,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Resource> Collection<T> {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            _marker: PhantomData,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// A missing key is an empty collection. An unreadable one is replaced by
    /// the defaults.
    pub async fn list_all(&self) -> Result<Vec<T>> {
        match self.storage.load_collection::<T>(T::KEY).await {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e) if e.is_corrupted() => {
                tracing::warn!("Collection '{}' is unreadable, reseeding defaults: {}", T::KEY, e);
                self.reseed().await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save_all(&self, items: &[T]) -> Result<()> {
        self.storage.save_collection(T::KEY, items).await
    }

    pub async fn reseed(&self) -> Result<Vec<T>> {
        let defaults = T::defaults();
        self.save_all(&defaults).await?;
        Ok(defaults)
    }

    pub async fn find(&self, id: &str) -> Result<Option<T>> {
        Ok(self.list_all().await?.into_iter().find(|item| item.id() == id))
    }

    /// Appends the record produced by `build`, which receives the new id.
    pub async fn insert<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(String) -> T + Send,
    {
        let mut items = self.list_all().await?;
        let id = next_id(&items, Utc::now());
        let item = build(id);
        items.push(item.clone());
        self.save_all(&items).await?;
        Ok(item)
    }

    /// Replaces the record with `id` by whatever `change` returns. Nothing is
    /// written when `change` fails.
    pub async fn replace<F>(&self, id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&T) -> Result<T> + Send,
    {
        let mut items = self.list_all().await?;
        let slot = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        let mut updated = change(slot)?;
        updated.set_id(id.to_string());
        *slot = updated.clone();

        self.save_all(&items).await?;
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<T> {
        let mut items = self.list_all().await?;
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        let removed = items.remove(position);
        self.save_all(&items).await?;
        Ok(removed)
    }

    /// Removes every record whose id is listed; unknown ids are skipped.
    pub async fn remove_many(&self, ids: &[String]) -> Result<usize> {
        let mut items = self.list_all().await?;
        let before = items.len();
        items.retain(|item| !ids.iter().any(|id| id == item.id()));

        let removed = before - items.len();
        if removed > 0 {
            self.save_all(&items).await?;
        }
        Ok(removed)
    }
}

fn not_found<T: Resource>(id: &str) -> AppError {
    AppError::NotFound(format!("{} record '{}'", T::KEY, id))
}

/// Millisecond timestamp id, bumped until it is unused in `existing`.
pub fn next_id<T: Resource>(existing: &[T], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|item| item.id() == id) {
            return id;
        }
        candidate += 1;
    }
}
