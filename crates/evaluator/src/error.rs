use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvaluatorError>;

#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Evaluation service error: {0}")]
    ServiceError(String),

    #[error("Invalid evaluation result: {0}")]
    InvalidResult(String),

    #[error("Submission not ready: {0}")]
    NotReady(String),
}
