use academy_admin::{
    auth::SESSION_KEY,
    config::Settings,
    error::AppError,
    service::ServiceContext,
    store::Storage,
};

async fn seeded() -> anyhow::Result<(Storage, ServiceContext)> {
    let storage = Storage::in_memory();
    let context = ServiceContext::new(storage.clone(), &Settings::default());
    context.seed_initializer.run().await?;
    Ok((storage, context))
}

#[tokio::test]
async fn test_default_credentials_log_in() -> anyhow::Result<()> {
    let (storage, context) = seeded().await?;
    assert!(!context.session_gate.is_authenticated().await?);

    let session = context
        .session_gate
        .authenticate("admin@school.com", "admin123")
        .await?;
    assert_eq!(session.email, "admin@school.com");
    assert_eq!(session.token, "mock-jwt-token");

    let marker: Option<String> = storage.get(SESSION_KEY).await?;
    assert_eq!(marker.as_deref(), Some("mock-jwt-token"));
    assert!(context.session_gate.is_authenticated().await?);

    context.session_gate.logout().await?;
    assert!(!context.session_gate.is_authenticated().await?);
    assert!(!storage.contains(SESSION_KEY).await?);

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_writes_no_marker() -> anyhow::Result<()> {
    let (storage, context) = seeded().await?;

    let err = context
        .session_gate
        .authenticate("admin@school.com", "admin124")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let err = context
        .session_gate
        .authenticate("someone@school.com", "admin123")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    assert!(!storage.contains(SESSION_KEY).await?);
    assert!(!context.session_gate.is_authenticated().await?);

    Ok(())
}
