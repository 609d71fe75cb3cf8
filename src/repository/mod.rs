use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::*;
use crate::error::Result;

pub mod collection;
pub mod announcement_repository;
pub mod event_repository;
pub mod teacher_repository;
pub mod department_repository;
pub mod gallery_repository;
pub mod message_repository;

pub use collection::{Collection, Resource};
pub use announcement_repository::StoreAnnouncementRepository;
pub use event_repository::StoreEventRepository;
pub use teacher_repository::StoreTeacherRepository;
pub use department_repository::StoreDepartmentRepository;
pub use gallery_repository::StoreGalleryRepository;
pub use message_repository::StoreMessageRepository;

/// Keys of every resource collection, in seeding order.
pub const COLLECTION_KEYS: [&str; 6] = [
    <Announcement as Resource>::KEY,
    <Event as Resource>::KEY,
    <Teacher as Resource>::KEY,
    <Department as Resource>::KEY,
    <GalleryItem as Resource>::KEY,
    <Message as Resource>::KEY,
];

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Current announcements. Expired, non-archived records are dropped from
    /// the stored collection as part of the read.
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn filter(&self, filter: &AnnouncementFilter) -> Result<Vec<Announcement>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Announcement>>;
    async fn create(&self, input: AnnouncementInput) -> Result<Announcement>;
    async fn update(&self, id: &str, input: AnnouncementInput) -> Result<Announcement>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn transition(&self, id: &str, status: AnnouncementStatus) -> Result<Announcement>;
    async fn record_view(&self, id: &str) -> Result<Announcement>;
    async fn stats(&self) -> Result<AnnouncementStats>;

    async fn submit_for_review(&self, id: &str) -> Result<Announcement> {
        self.transition(id, AnnouncementStatus::Pending).await
    }

    async fn publish(&self, id: &str) -> Result<Announcement> {
        self.transition(id, AnnouncementStatus::Published).await
    }

    async fn archive(&self, id: &str) -> Result<Announcement> {
        self.transition(id, AnnouncementStatus::Archived).await
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Event>>;
    async fn query(&self, filter: &EventFilter, sort: EventSort, now: DateTime<Utc>) -> Result<Vec<Event>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>>;
    async fn create(&self, input: EventInput) -> Result<Event>;
    async fn update(&self, id: &str, input: EventInput) -> Result<Event>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn delete_many(&self, ids: &[String]) -> Result<usize>;
    async fn transition(&self, id: &str, status: EventStatus) -> Result<Event>;
    async fn stats(&self, now: DateTime<Utc>) -> Result<EventStats>;

    async fn cancel(&self, id: &str) -> Result<Event> {
        self.transition(id, EventStatus::Cancelled).await
    }

    async fn reactivate(&self, id: &str) -> Result<Event> {
        self.transition(id, EventStatus::Upcoming).await
    }
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Teacher>>;
    async fn filter(&self, filter: &TeacherFilter) -> Result<Vec<Teacher>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Teacher>>;
    async fn create(&self, input: TeacherInput) -> Result<Teacher>;
    async fn update(&self, id: &str, input: TeacherInput) -> Result<Teacher>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn transition(&self, id: &str, status: TeacherStatus) -> Result<Teacher>;
    async fn stats(&self) -> Result<TeacherStats>;
    /// Appends teachers from a JSON array, giving fresh ids to any that clash.
    async fn import_json(&self, json: &str) -> Result<Vec<Teacher>>;
    async fn export_json(&self) -> Result<String>;

    async fn archive(&self, id: &str) -> Result<Teacher> {
        self.transition(id, TeacherStatus::Archived).await
    }
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Department>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Department>>;
    async fn create(&self, input: DepartmentInput) -> Result<Department>;
    async fn update(&self, id: &str, input: DepartmentInput) -> Result<Department>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<GalleryItem>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<GalleryItem>>;
    async fn create(&self, input: GalleryItemInput) -> Result<GalleryItem>;
    async fn update(&self, id: &str, input: GalleryItemInput) -> Result<GalleryItem>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Message>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Message>>;
    async fn create(&self, input: MessageInput) -> Result<Message>;
    async fn update(&self, id: &str, input: MessageInput) -> Result<Message>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn mark_read(&self, id: &str) -> Result<Message>;
    /// Records a reply. Nothing is actually sent; the outgoing mail is logged.
    async fn reply(&self, id: &str, content: &str) -> Result<Message>;
    async fn counts(&self) -> Result<MessageCounts>;
}
