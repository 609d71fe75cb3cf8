use std::sync::Arc;

use academy_admin::{
    domain::{DepartmentInput, GalleryItemInput, MessageInput},
    error::AppError,
    repository::{
        DepartmentRepository, GalleryRepository, MessageRepository, StoreDepartmentRepository,
        StoreGalleryRepository, StoreMessageRepository,
    },
    store::{SqliteStore, Storage},
};

async fn storage() -> anyhow::Result<Storage> {
    Ok(Storage::new(Arc::new(SqliteStore::in_memory().await?)))
}

#[tokio::test]
async fn test_department_crud() -> anyhow::Result<()> {
    let repo = StoreDepartmentRepository::new(storage().await?);

    let created = repo
        .create(DepartmentInput {
            name: "Arts Department".to_string(),
            description: "Music, drama and visual arts.".to_string(),
        })
        .await?;
    assert_eq!(repo.list().await?, vec![created.clone()]);

    let data = DepartmentInput {
        name: "Creative Arts".to_string(),
        description: "Music, drama, dance and visual arts.".to_string(),
    };
    let updated = repo.update(&created.id, data.clone()).await?;
    let listed = repo.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].name, data.name);
    assert_eq!(listed[0].description, data.description);
    assert_eq!(listed[0].created_at, created.created_at);
    assert_eq!(listed[0], updated);

    let err = repo
        .create(DepartmentInput {
            name: "Empty".to_string(),
            description: " ".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    repo.delete(&created.id).await?;
    assert!(repo.list().await?.is_empty());
    assert!(matches!(repo.delete(&created.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_gallery_crud() -> anyhow::Result<()> {
    let repo = StoreGalleryRepository::new(storage().await?);

    let item = repo
        .create(GalleryItemInput {
            image_url: "https://images.example.com/sports-day.jpg".to_string(),
            caption: "Sports Day".to_string(),
        })
        .await?;

    let updated = repo
        .update(
            &item.id,
            GalleryItemInput {
                image_url: "https://images.example.com/sports-day-2.jpg".to_string(),
                caption: "Sports Day relay final".to_string(),
            },
        )
        .await?;
    assert_eq!(updated.caption, "Sports Day relay final");
    assert_eq!(repo.find_by_id(&item.id).await?, Some(updated));

    let err = repo
        .update(
            &item.id,
            GalleryItemInput {
                image_url: "images/local.jpg".to_string(),
                caption: "Broken".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    repo.delete(&item.id).await?;
    assert!(repo.find_by_id(&item.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_message_lifecycle() -> anyhow::Result<()> {
    let repo = StoreMessageRepository::new(storage().await?);

    let first = repo
        .create(MessageInput {
            name: "John Smith".to_string(),
            email: "john@example.com".to_string(),
            subject: "Admission Inquiry".to_string(),
            message: "What is the admission process for grade 10?".to_string(),
        })
        .await?;
    let second = repo
        .create(MessageInput {
            name: "Maria Garcia".to_string(),
            email: "maria@example.com".to_string(),
            subject: "Teacher Feedback".to_string(),
            message: "Thank you for this semester.".to_string(),
        })
        .await?;
    assert!(!first.read && !first.replied);

    let counts = repo.counts().await?;
    assert_eq!((counts.total, counts.unread, counts.replied), (2, 2, 0));

    let read = repo.mark_read(&second.id).await?;
    assert!(read.read);
    assert!(!read.replied);

    let replied = repo.reply(&first.id, "Applications open in March.").await?;
    assert!(replied.read && replied.replied);
    assert_eq!(replied.reply_content.as_deref(), Some("Applications open in March."));
    assert!(replied.replied_at.is_some());

    let counts = repo.counts().await?;
    assert_eq!((counts.total, counts.unread, counts.replied), (2, 0, 1));

    let err = repo.reply(&second.id, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = repo
        .create(MessageInput {
            name: "Anon".to_string(),
            email: "not-an-email".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}
