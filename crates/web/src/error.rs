use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evaluator::EvaluatorError;
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Evaluator(EvaluatorError),
    Validation(ValidationErrors),
    BadRequest(String),
    PayloadTooLarge(String),
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Evaluator(e) => write!(f, "Evaluator error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Ranking(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Evaluator(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(StorageError::Ranking(e)) => {
                json!({
                    "error": e.to_string(),
                    "details": [format!("submission_id: {}", e.submission_id())]
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Evaluator(e) => {
                tracing::error!("Evaluator error: {}", e);
                json!({
                    "error": "The evaluation service failed",
                    "details": [e.to_string()]
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<EvaluatorError> for WebError {
    fn from(error: EvaluatorError) -> Self {
        match error {
            EvaluatorError::StorageError(e) => Self::Storage(e),
            EvaluatorError::NotReady(msg) => Self::BadRequest(msg),
            other => Self::Evaluator(other),
        }
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<MultipartError> for WebError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(error.body_text())
        } else {
            Self::BadRequest(format!("Invalid multipart body: {}", error.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use storage::services::ranking::RankingError;

    use super::*;

    fn status_of(error: WebError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_storage_errors_map_to_status() {
        assert_eq!(status_of(StorageError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StorageError::ConstraintViolation("dup".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StorageError::Ranking(RankingError::MissingScore { id: 4 }).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(StorageError::Database(sqlx::Error::PoolTimedOut).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_evaluator_errors_map_to_status() {
        assert_eq!(
            status_of(EvaluatorError::ServiceError("down".to_string()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(EvaluatorError::NotReady("not evaluated".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EvaluatorError::StorageError(StorageError::NotFound).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let response =
            WebError::InternalServerError("secret connection string".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("secret"));
    }
}
