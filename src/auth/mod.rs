//! Single-administrator login backed by the key-value store.
//!
//! The credential pair is stored and compared in plaintext. This mirrors a
//! local demo console and is not suitable for a real deployment.

use subtle::ConstantTimeEq;

use crate::{
    domain::{AdminCredentials, Session},
    error::{AppError, Result},
    store::Storage,
};

pub const ADMIN_KEY: &str = "admin";
pub const SESSION_KEY: &str = "adminToken";

pub struct SessionGate {
    storage: Storage,
    marker: String,
    defaults: AdminCredentials,
}

impl SessionGate {
    /// `marker` is the value persisted under [`SESSION_KEY`] while logged in;
    /// `defaults` replaces an unreadable admin record.
    pub fn new(storage: Storage, marker: String, defaults: AdminCredentials) -> Self {
        Self {
            storage,
            marker,
            defaults,
        }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
        let Some(admin) = self.admin_record().await? else {
            tracing::warn!("Login attempt for {} but no admin record exists", email);
            return Err(AppError::Unauthorized);
        };

        let email_matches = email.as_bytes().ct_eq(admin.email.as_bytes());
        let password_matches = password.as_bytes().ct_eq(admin.password.as_bytes());
        if !bool::from(email_matches & password_matches) {
            tracing::warn!("Rejected login for {}", email);
            return Err(AppError::Unauthorized);
        }

        self.storage.set(SESSION_KEY, &self.marker).await?;
        tracing::info!("Admin {} logged in", admin.email);
        Ok(Session {
            email: admin.email,
            token: self.marker.clone(),
        })
    }

    pub async fn logout(&self) -> Result<()> {
        self.storage.clear(SESSION_KEY).await?;
        tracing::info!("Admin session cleared");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        self.storage.contains(SESSION_KEY).await
    }

    async fn admin_record(&self) -> Result<Option<AdminCredentials>> {
        match self.storage.get::<AdminCredentials>(ADMIN_KEY).await {
            Err(e) if e.is_corrupted() => {
                tracing::warn!("Admin record is unreadable, restoring defaults: {}", e);
                self.storage.set(ADMIN_KEY, &self.defaults).await?;
                Ok(Some(self.defaults.clone()))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AdminCredentials {
        AdminCredentials {
            email: "admin@school.com".into(),
            password: "admin123".into(),
        }
    }

    #[tokio::test]
    async fn missing_admin_record_rejects_everyone() {
        let gate = SessionGate::new(Storage::in_memory(), "token".into(), defaults());
        let err = gate.authenticate("admin@school.com", "admin123").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(!gate.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn corrupted_admin_record_falls_back_to_defaults() {
        let storage = Storage::in_memory();
        storage.set(ADMIN_KEY, "not an object").await.unwrap();
        let gate = SessionGate::new(storage.clone(), "token".into(), defaults());

        let session = gate.authenticate("admin@school.com", "admin123").await.unwrap();
        assert_eq!(session.token, "token");

        let restored: Option<AdminCredentials> = storage.get(ADMIN_KEY).await.unwrap();
        assert_eq!(restored, Some(defaults()));
    }
}
