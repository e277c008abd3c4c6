use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evaluator::SubmissionEvaluator;
use storage::{
    Database,
    dto::submission::{SubmissionAnalysis, SubmissionResponse, UpdateSubmissionRequest},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission found", body = SubmissionResponse),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn get_submission(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let submission = services::get_submission(db.pool(), id).await?;

    Ok(Json(SubmissionResponse::from(submission)).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/submissions/{id}",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    request_body = UpdateSubmissionRequest,
    responses(
        (status = 200, description = "Submission updated successfully", body = SubmissionResponse),
        (status = 400, description = "Validation error, or the update would leave an unevaluated submission scored"),
        (status = 404, description = "Submission not found"),
        (status = 422, description = "Re-ranking found an evaluated submission without a usable score")
    ),
    tag = "submissions"
)]
pub async fn update_submission(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(update_req): Json<UpdateSubmissionRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    if update_req.evaluated == Some(false)
        && (update_req.score.is_some() || update_req.rank.is_some())
    {
        return Err(WebError::BadRequest(
            "An unevaluated submission cannot carry a score or rank".to_string(),
        ));
    }

    let updated = services::update_submission(db.pool(), id, &update_req).await?;

    Ok(Json(SubmissionResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/submissions/{id}",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 204, description = "Submission deleted successfully"),
        (status = 404, description = "Submission not found")
    ),
    tag = "submissions"
)]
pub async fn delete_submission(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_submission(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/submissions/{id}/analysis",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Summary, keywords, strengths and weaknesses", body = SubmissionAnalysis),
        (status = 400, description = "Submission has not been evaluated yet"),
        (status = 404, description = "Submission not found"),
        (status = 502, description = "Evaluation service failed")
    ),
    tag = "submissions"
)]
pub async fn get_submission_analysis(
    State(db): State<Database>,
    State(evaluator): State<Arc<dyn SubmissionEvaluator>>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionAnalysis>, WebError> {
    let analysis = services::get_analysis(db.pool(), evaluator.as_ref(), id).await?;

    Ok(Json(analysis))
}
