use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Listing fetch error: {0}")]
    Fetch(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
