//! First-run population of the store.

pub mod defaults;

use serde::Serialize;
use serde_json::Value;

use crate::{
    auth::{ADMIN_KEY, SESSION_KEY},
    domain::*,
    error::Result,
    repository::{Resource, COLLECTION_KEYS},
    store::Storage,
};

/// Keys written by one [`SeedInitializer::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub written: Vec<&'static str>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

pub struct SeedInitializer {
    storage: Storage,
    admin: AdminCredentials,
}

impl SeedInitializer {
    pub fn new(storage: Storage, admin: AdminCredentials) -> Self {
        Self { storage, admin }
    }

    /// Writes defaults for every key that is absent. Present keys are never
    /// touched, so running this on every start is safe.
    pub async fn run(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        self.seed_collection::<Announcement>(&mut report).await?;
        self.seed_collection::<Event>(&mut report).await?;
        self.seed_collection::<Teacher>(&mut report).await?;
        self.seed_collection::<Department>(&mut report).await?;
        self.seed_collection::<GalleryItem>(&mut report).await?;
        self.seed_collection::<Message>(&mut report).await?;

        if self.is_absent(ADMIN_KEY).await? {
            self.storage.set(ADMIN_KEY, &self.admin).await?;
            report.written.push(ADMIN_KEY);
        }

        if report.is_empty() {
            tracing::debug!("Store already seeded");
        } else {
            tracing::info!("Seeded defaults for: {}", report.written.join(", "));
        }
        Ok(report)
    }

    /// Removes every collection, the admin record and any session marker.
    pub async fn reset(&self) -> Result<()> {
        for key in COLLECTION_KEYS.iter().chain([&ADMIN_KEY, &SESSION_KEY]) {
            self.storage.clear(key).await?;
        }
        tracing::info!("Cleared all stored data");
        Ok(())
    }

    async fn seed_collection<T: Resource>(&self, report: &mut SeedReport) -> Result<()> {
        if self.is_absent(T::KEY).await? {
            self.storage.save_collection(T::KEY, &T::defaults()).await?;
            report.written.push(T::KEY);
        }
        Ok(())
    }

    /// Missing keys and stored `null` count as absent. So does a document
    /// that is not JSON at all, which is reseeded rather than left to fail.
    async fn is_absent(&self, key: &str) -> Result<bool> {
        match self.storage.get::<Value>(key).await {
            Ok(value) => Ok(value.is_none()),
            Err(e) if e.is_corrupted() => {
                tracing::warn!("Replacing unreadable '{}' with defaults: {}", key, e);
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
