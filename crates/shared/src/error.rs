use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    StorageRead,
    StorageWrite,
}

/// User-correctable input problems, raised before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("story title must not be empty")]
    EmptyTitle,
    #[error("story content must not be empty")]
    EmptyContent,
}

/// Presentation-facing form of a failed store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::StorageRead | ErrorCode::StorageWrite)
    }
}

impl From<ValidationError> for ErrorReport {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
