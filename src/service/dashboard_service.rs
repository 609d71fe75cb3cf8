use std::sync::Arc;

use serde::Serialize;

use crate::{error::Result, repository::*};

/// Record counts shown on the console's landing page.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub announcements: usize,
    pub events: usize,
    pub teachers: usize,
    pub departments: usize,
    pub gallery: usize,
    pub messages: usize,
    pub unread_messages: usize,
}

pub struct DashboardService {
    announcement_repo: Arc<dyn AnnouncementRepository>,
    event_repo: Arc<dyn EventRepository>,
    teacher_repo: Arc<dyn TeacherRepository>,
    department_repo: Arc<dyn DepartmentRepository>,
    gallery_repo: Arc<dyn GalleryRepository>,
    message_repo: Arc<dyn MessageRepository>,
}

impl DashboardService {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        event_repo: Arc<dyn EventRepository>,
        teacher_repo: Arc<dyn TeacherRepository>,
        department_repo: Arc<dyn DepartmentRepository>,
        gallery_repo: Arc<dyn GalleryRepository>,
        message_repo: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            announcement_repo,
            event_repo,
            teacher_repo,
            department_repo,
            gallery_repo,
            message_repo,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        let messages = self.message_repo.counts().await?;
        Ok(DashboardSummary {
            announcements: self.announcement_repo.list().await?.len(),
            events: self.event_repo.list().await?.len(),
            teachers: self.teacher_repo.list().await?.len(),
            departments: self.department_repo.list().await?.len(),
            gallery: self.gallery_repo.list().await?.len(),
            messages: messages.total,
            unread_messages: messages.unread,
        })
    }
}
