use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage backend unreachable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
