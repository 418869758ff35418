use shared::{
    domain::StoryId,
    error::{ErrorCode, ErrorReport, ValidationError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to load stories")]
    StorageRead(#[source] anyhow::Error),
    #[error("failed to save stories")]
    StorageWrite(#[source] anyhow::Error),
    #[error("story {0} not found")]
    NotFound(StoryId),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::StorageRead(_) => ErrorCode::StorageRead,
            Self::StorageWrite(_) => ErrorCode::StorageWrite,
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageRead(_) | Self::StorageWrite(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<&StoreError> for ErrorReport {
    fn from(value: &StoreError) -> Self {
        ErrorReport::new(value.code(), value.to_string())
    }
}
