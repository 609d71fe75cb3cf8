use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::{Announcement, AnnouncementFilter, AnnouncementInput, AnnouncementStats, AnnouncementStatus},
    error::{AppError, Result},
    repository::{AnnouncementRepository, Collection, Resource},
    seed::defaults,
    store::Storage,
};

impl Resource for Announcement {
    const KEY: &'static str = "announcements";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::announcements()
    }
}

pub struct StoreAnnouncementRepository {
    collection: Collection<Announcement>,
}

impl StoreAnnouncementRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }

    /// Loads the collection and drops expired records from storage. Every
    /// read and edit goes through here first, so an expired id is not found.
    async fn load_current(&self) -> Result<Vec<Announcement>> {
        let now = Utc::now();
        let (expired, current): (Vec<_>, Vec<_>) = self
            .collection
            .list_all()
            .await?
            .into_iter()
            .partition(|a| a.is_expired(now));

        if !expired.is_empty() {
            tracing::info!("Removing {} expired announcements", expired.len());
            self.collection.save_all(&current).await?;
        }
        Ok(current)
    }
}

fn invalid_transition(from: AnnouncementStatus, to: AnnouncementStatus) -> AppError {
    AppError::InvalidTransition(format!(
        "announcement cannot move from {} to {}",
        from.as_str(),
        to.as_str()
    ))
}

#[async_trait]
impl AnnouncementRepository for StoreAnnouncementRepository {
    async fn list(&self) -> Result<Vec<Announcement>> {
        self.load_current().await
    }

    async fn filter(&self, filter: &AnnouncementFilter) -> Result<Vec<Announcement>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>> {
        Ok(self.list().await?.into_iter().find(|a| a.id == id))
    }

    async fn create(&self, input: AnnouncementInput) -> Result<Announcement> {
        let now = Utc::now();
        input.validate(now, None)?;

        let announcement = self
            .collection
            .insert(|id| Announcement::from_input(id, input, now))
            .await?;
        tracing::info!("Created announcement {} ({})", announcement.id, announcement.status.as_str());
        Ok(announcement)
    }

    async fn update(&self, id: &str, input: AnnouncementInput) -> Result<Announcement> {
        self.load_current().await?;
        let now = Utc::now();
        let announcement = self
            .collection
            .replace(id, |current| {
                input.validate(now, current.publish_date)?;
                if let Some(next) = input.status {
                    if next != current.status && !current.status.can_transition_to(next) {
                        return Err(invalid_transition(current.status, next));
                    }
                }

                let mut updated = current.clone();
                updated.previous_versions.push(current.revision());
                updated.apply_input(input, now);
                updated.version = current.version + 1;
                updated.updated_at = now;
                match updated.status {
                    AnnouncementStatus::Published if updated.published_at.is_none() => {
                        updated.published_at = Some(now);
                    }
                    AnnouncementStatus::Archived if updated.archived_at.is_none() => {
                        updated.archived_at = Some(now);
                    }
                    _ => {}
                }
                Ok(updated)
            })
            .await?;
        tracing::info!("Updated announcement {} to version {}", announcement.id, announcement.version);
        Ok(announcement)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.load_current().await?;
        self.collection.remove(id).await?;
        tracing::info!("Deleted announcement {}", id);
        Ok(())
    }

    async fn transition(&self, id: &str, status: AnnouncementStatus) -> Result<Announcement> {
        self.load_current().await?;
        let now = Utc::now();
        let announcement = self
            .collection
            .replace(id, |current| {
                if !current.status.can_transition_to(status) {
                    return Err(invalid_transition(current.status, status));
                }

                let mut updated = current.clone();
                updated.status = status;
                updated.updated_at = now;
                match status {
                    AnnouncementStatus::Published => {
                        updated.published_at = Some(now);
                        updated.publish_date.get_or_insert(now);
                    }
                    AnnouncementStatus::Archived => updated.archived_at = Some(now),
                    AnnouncementStatus::Draft | AnnouncementStatus::Pending => {}
                }
                Ok(updated)
            })
            .await?;
        tracing::info!("Announcement {} is now {}", announcement.id, status.as_str());
        Ok(announcement)
    }

    async fn record_view(&self, id: &str) -> Result<Announcement> {
        self.load_current().await?;
        self.collection
            .replace(id, |current| {
                let mut viewed = current.clone();
                viewed.views += 1;
                Ok(viewed)
            })
            .await
    }

    async fn stats(&self) -> Result<AnnouncementStats> {
        Ok(AnnouncementStats::from_slice(&self.list().await?))
    }
}
