use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid entry: {0}")]
    Validation(String),

    #[error("Entry with id {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Coarse classification for presentation code: re-prompt, report, or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Database(_) | StoreError::Io(_) | StoreError::Migration(_) => {
                ErrorKind::Storage
            }
        }
    }
}
