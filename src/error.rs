use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted state under key '{key}': {reason}")]
    CorruptedState { key: String, reason: String },

    #[error("Key '{key}' uses schema version {version}, newer than this build supports")]
    UnsupportedSchema { key: String, version: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn corrupted(key: &str, reason: impl ToString) -> Self {
        AppError::CorruptedState {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_corrupted(&self) -> bool {
        matches!(self, AppError::CorruptedState { .. })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(format!("Migration failed: {}", err))
    }
}
