use std::sync::Arc;

use academy_admin::{
    domain::{
        Announcement, AnnouncementFilter, AnnouncementInput, AnnouncementStatus, Priority,
    },
    error::AppError,
    repository::{AnnouncementRepository, StoreAnnouncementRepository},
    store::{SqliteStore, Storage},
};
use chrono::{Duration, Utc};

async fn storage() -> anyhow::Result<Storage> {
    Ok(Storage::new(Arc::new(SqliteStore::in_memory().await?)))
}

fn input(title: &str) -> AnnouncementInput {
    AnnouncementInput {
        title: title.to_string(),
        content: "Timetables are posted on the notice board.".to_string(),
        status: Some(AnnouncementStatus::Draft),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_draft_then_publish() -> anyhow::Result<()> {
    let repo = StoreAnnouncementRepository::new(storage().await?);

    let created = repo.create(input("Exam Schedule")).await?;

    let listed = repo.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].status, AnnouncementStatus::Draft);
    assert_eq!(listed[0].version, 1);
    assert_eq!(listed[0].views, 0);
    assert!(listed[0].published_at.is_none());

    let published = repo.transition(&created.id, AnnouncementStatus::Published).await?;
    assert_eq!(published.status, AnnouncementStatus::Published);
    assert!(published.published_at.is_some());

    let stored = repo.find_by_id(&created.id).await?.expect("announcement exists");
    assert_eq!(stored.status, AnnouncementStatus::Published);
    assert_eq!(stored.published_at, published.published_at);

    Ok(())
}

#[tokio::test]
async fn test_update_keeps_history_and_creation_time() -> anyhow::Result<()> {
    let repo = StoreAnnouncementRepository::new(storage().await?);
    let created = repo.create(input("Exam Schedule")).await?;
    repo.record_view(&created.id).await?;

    let mut data = input("Revised Exam Schedule");
    data.content = "Math moved to Thursday.".to_string();
    data.category = "academic".to_string();
    data.priority = Priority::Important;
    data.tags = vec!["exams".to_string()];
    let updated = repo.update(&created.id, data.clone()).await?;

    let listed = repo.list().await?;
    let matching: Vec<&Announcement> = listed.iter().filter(|a| a.id == created.id).collect();
    assert_eq!(matching.len(), 1);
    let stored = matching[0];

    assert_eq!(stored, &updated);
    assert_eq!(stored.title, data.title);
    assert_eq!(stored.content, data.content);
    assert_eq!(stored.category, data.category);
    assert_eq!(stored.priority, data.priority);
    assert_eq!(stored.tags, data.tags);
    assert_eq!(stored.created_at, created.created_at);
    assert_eq!(stored.views, 1);
    assert_eq!(stored.version, 2);
    assert_eq!(stored.previous_versions.len(), 1);
    assert_eq!(stored.previous_versions[0].title, "Exam Schedule");
    assert_eq!(stored.previous_versions[0].version, 1);

    Ok(())
}

#[tokio::test]
async fn test_expired_announcements_are_pruned_on_read() -> anyhow::Result<()> {
    let storage = storage().await?;
    let repo = StoreAnnouncementRepository::new(storage.clone());

    let stale = repo.create(input("Last term's notice")).await?;
    let archived = repo.create(input("Archived notice")).await?;
    let current = repo.create(input("This week's notice")).await?;
    repo.archive(&archived.id).await?;

    // Expiry dates in the past cannot be submitted, so backdate them in place.
    let mut stored: Vec<Announcement> = storage.load_collection("announcements").await?.unwrap_or_default();
    for a in stored.iter_mut().filter(|a| a.id != current.id) {
        a.expiry_date = Some(Utc::now() - Duration::days(1));
    }
    storage.save_collection("announcements", &stored).await?;

    let listed = repo.list().await?;
    let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
    assert!(!ids.contains(&stale.id.as_str()));
    assert!(ids.contains(&archived.id.as_str()));
    assert!(ids.contains(&current.id.as_str()));

    let persisted: Vec<Announcement> = storage.load_collection("announcements").await?.unwrap_or_default();
    assert!(persisted.iter().all(|a| a.id != stale.id));
    assert_eq!(persisted.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_expired_announcements_cannot_be_edited() -> anyhow::Result<()> {
    let storage = storage().await?;
    let repo = StoreAnnouncementRepository::new(storage.clone());
    let draft = repo.create(input("Old draft")).await?;

    let mut stored: Vec<Announcement> = storage.load_collection("announcements").await?.unwrap_or_default();
    stored[0].expiry_date = Some(Utc::now() - Duration::days(1));
    storage.save_collection("announcements", &stored).await?;

    let err = repo.transition(&draft.id, AnnouncementStatus::Published).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = repo.record_view(&draft.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = repo.update(&draft.id, input("Old draft, revised")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let persisted: Vec<Announcement> = storage.load_collection("announcements").await?.unwrap_or_default();
    assert!(persisted.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unmodelled_fields_survive_other_writes() -> anyhow::Result<()> {
    let storage = storage().await?;
    storage
        .set(
            "announcements",
            &serde_json::json!([{
                "id": "1",
                "title": "Library hours",
                "content": "Open until 6pm.",
                "readConfirmations": [{"userId": "p-7", "at": "2024-01-16T08:00:00Z"}],
                "pinnedBy": "principal"
            }]),
        )
        .await?;

    let repo = StoreAnnouncementRepository::new(storage.clone());
    repo.create(input("Exam Schedule")).await?;
    repo.record_view("1").await?;

    let raw: serde_json::Value = storage.get("announcements").await?.unwrap_or_default();
    let legacy = &raw["items"][0];
    assert_eq!(legacy["readConfirmations"][0]["userId"], "p-7");
    assert_eq!(legacy["pinnedBy"], "principal");
    assert_eq!(legacy["views"], 1);

    Ok(())
}

#[tokio::test]
async fn test_archived_is_terminal() -> anyhow::Result<()> {
    let repo = StoreAnnouncementRepository::new(storage().await?);
    let created = repo.create(input("Fire drill")).await?;

    repo.submit_for_review(&created.id).await?;
    let archived = repo.archive(&created.id).await?;
    assert_eq!(archived.status, AnnouncementStatus::Archived);
    assert!(archived.archived_at.is_some());

    let err = repo.publish(&created.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let mut reopen = input("Fire drill");
    reopen.status = Some(AnnouncementStatus::Draft);
    let err = repo.update(&created.id, reopen).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let stored = repo.find_by_id(&created.id).await?.expect("announcement exists");
    assert_eq!(stored.status, AnnouncementStatus::Archived);
    assert_eq!(stored.version, 1);

    Ok(())
}

#[tokio::test]
async fn test_filter_and_stats() -> anyhow::Result<()> {
    let repo = StoreAnnouncementRepository::new(storage().await?);

    let mut for_parents = input("Parent evening");
    for_parents.target_audience = vec!["Parents".to_string()];
    for_parents.priority = Priority::Critical;
    repo.create(for_parents).await?;

    let mut for_staff = input("Staff meeting");
    for_staff.target_audience = vec!["Teachers".to_string()];
    let staff = repo.create(for_staff).await?;
    repo.publish(&staff.id).await?;

    repo.create(input("Whole school assembly")).await?;

    let parents = repo
        .filter(&AnnouncementFilter {
            audience: Some("Parents".to_string()),
            ..Default::default()
        })
        .await?;
    let titles: Vec<&str> = parents.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Parent evening", "Whole school assembly"]);

    let searched = repo
        .filter(&AnnouncementFilter {
            search: Some("  MEETING ".to_string()),
            status: Some(AnnouncementStatus::Published),
            ..Default::default()
        })
        .await?;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, staff.id);

    let stats = repo.stats().await?;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.draft, 2);
    assert_eq!(stats.critical, 1);

    Ok(())
}

#[tokio::test]
async fn test_invalid_input_is_not_persisted() -> anyhow::Result<()> {
    let storage = storage().await?;
    let repo = StoreAnnouncementRepository::new(storage.clone());

    let err = repo.create(input("   ")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut backdated = input("Backdated");
    backdated.publish_date = Some(Utc::now() - Duration::days(2));
    let err = repo.create(backdated).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(!storage.contains("announcements").await?);

    let err = repo.delete("missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
