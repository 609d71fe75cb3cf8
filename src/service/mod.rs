pub mod dashboard_service;

use std::sync::Arc;

use crate::auth::SessionGate;
use crate::config::Settings;
use crate::repository::*;
use crate::seed::SeedInitializer;
use crate::store::Storage;
use dashboard_service::DashboardService;

pub use dashboard_service::DashboardSummary;

/// Everything the console needs, wired once per process.
pub struct ServiceContext {
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub teacher_repo: Arc<dyn TeacherRepository>,
    pub department_repo: Arc<dyn DepartmentRepository>,
    pub gallery_repo: Arc<dyn GalleryRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
    pub session_gate: Arc<SessionGate>,
    pub seed_initializer: Arc<SeedInitializer>,
    pub dashboard_service: Arc<DashboardService>,
    pub storage: Storage,
}

impl ServiceContext {
    pub fn new(storage: Storage, settings: &Settings) -> Self {
        let announcement_repo: Arc<dyn AnnouncementRepository> =
            Arc::new(StoreAnnouncementRepository::new(storage.clone()));
        let event_repo: Arc<dyn EventRepository> = Arc::new(StoreEventRepository::new(storage.clone()));
        let teacher_repo: Arc<dyn TeacherRepository> = Arc::new(StoreTeacherRepository::new(storage.clone()));
        let department_repo: Arc<dyn DepartmentRepository> =
            Arc::new(StoreDepartmentRepository::new(storage.clone()));
        let gallery_repo: Arc<dyn GalleryRepository> = Arc::new(StoreGalleryRepository::new(storage.clone()));
        let message_repo: Arc<dyn MessageRepository> = Arc::new(StoreMessageRepository::new(storage.clone()));

        let session_gate = Arc::new(SessionGate::new(
            storage.clone(),
            settings.auth.session_marker.clone(),
            settings.auth.default_credentials(),
        ));
        let seed_initializer = Arc::new(SeedInitializer::new(
            storage.clone(),
            settings.auth.default_credentials(),
        ));

        let dashboard_service = Arc::new(DashboardService::new(
            announcement_repo.clone(),
            event_repo.clone(),
            teacher_repo.clone(),
            department_repo.clone(),
            gallery_repo.clone(),
            message_repo.clone(),
        ));

        Self {
            announcement_repo,
            event_repo,
            teacher_repo,
            department_repo,
            gallery_repo,
            message_repo,
            session_gate,
            seed_initializer,
            dashboard_service,
            storage,
        }
    }
}
