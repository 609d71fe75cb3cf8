use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::{GalleryItem, GalleryItemInput},
    error::Result,
    repository::{Collection, GalleryRepository, Resource},
    seed::defaults,
    store::Storage,
};

impl Resource for GalleryItem {
    const KEY: &'static str = "gallery";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::gallery()
    }
}

pub struct StoreGalleryRepository {
    collection: Collection<GalleryItem>,
}

impl StoreGalleryRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }
}

#[async_trait]
impl GalleryRepository for StoreGalleryRepository {
    async fn list(&self) -> Result<Vec<GalleryItem>> {
        self.collection.list_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryItem>> {
        self.collection.find(id).await
    }

    async fn create(&self, input: GalleryItemInput) -> Result<GalleryItem> {
        input.validate()?;
        let now = Utc::now();

        let item = self
            .collection
            .insert(|id| GalleryItem::from_input(id, input, now))
            .await?;
        tracing::info!("Added gallery item {}", item.id);
        Ok(item)
    }

    async fn update(&self, id: &str, input: GalleryItemInput) -> Result<GalleryItem> {
        input.validate()?;
        let now = Utc::now();

        self.collection
            .replace(id, |current| {
                let mut updated = GalleryItem::from_input(current.id.clone(), input, current.created_at);
                updated.updated_at = now;
                Ok(updated)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        tracing::info!("Removed gallery item {}", id);
        Ok(())
    }
}
