use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{query_events, Event, EventFilter, EventInput, EventSort, EventStats, EventStatus},
    error::{AppError, Result},
    repository::{Collection, EventRepository, Resource},
    seed::defaults,
    store::Storage,
};

impl Resource for Event {
    const KEY: &'static str = "events";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::events()
    }
}

pub struct StoreEventRepository {
    collection: Collection<Event>,
}

impl StoreEventRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }
}

#[async_trait]
impl EventRepository for StoreEventRepository {
    async fn list(&self) -> Result<Vec<Event>> {
        self.collection.list_all().await
    }

    async fn query(&self, filter: &EventFilter, sort: EventSort, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let events = self.collection.list_all().await?;
        tracing::debug!("Querying {} events", events.len());
        Ok(query_events(events, filter, sort, now))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        self.collection.find(id).await
    }

    async fn create(&self, input: EventInput) -> Result<Event> {
        input.validate()?;
        let now = Utc::now();

        let event = self
            .collection
            .insert(|id| Event::from_input(id, input, now))
            .await?;
        tracing::info!("Created event {}: {}", event.id, event.title);
        Ok(event)
    }

    async fn update(&self, id: &str, input: EventInput) -> Result<Event> {
        input.validate()?;
        let now = Utc::now();

        let event = self
            .collection
            .replace(id, |current| {
                let mut updated = current.clone();
                updated.apply_input(input);
                updated.updated_at = now;
                Ok(updated)
            })
            .await?;
        tracing::info!("Updated event {}", event.id);
        Ok(event)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        tracing::info!("Deleted event {}", id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[String]) -> Result<usize> {
        let removed = self.collection.remove_many(ids).await?;
        tracing::info!("Deleted {} of {} requested events", removed, ids.len());
        Ok(removed)
    }

    async fn transition(&self, id: &str, status: EventStatus) -> Result<Event> {
        let now = Utc::now();
        let event = self
            .collection
            .replace(id, |current| {
                if current.status == status {
                    return Err(AppError::InvalidTransition(format!(
                        "event is already {}",
                        status.as_str()
                    )));
                }
                let mut updated = current.clone();
                updated.status = status;
                updated.updated_at = now;
                Ok(updated)
            })
            .await?;
        tracing::info!("Event {} is now {}", event.id, status.as_str());
        Ok(event)
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<EventStats> {
        Ok(EventStats::from_slice(&self.collection.list_all().await?, now))
    }
}
