use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use evaluator::SubmissionEvaluator;
use storage::{
    Database,
    dto::{
        analytics::HackathonAnalytics,
        common::{PaginatedResponse, PaginationParams},
        hackathon::{CreateHackathonRequest, HackathonResponse, UpdateHackathonStatusRequest},
        ranking::{LeaderboardEntry, RankingReport},
        submission::SubmissionResponse,
    },
};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::WebError;
use crate::features::files::services::content_disposition;
use crate::features::upload::UploadForm;

use super::services;

/// Multipart body of a submission upload
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmissionUploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Overrides the team name taken from `<team>_<hackathon>.<ext>`
    team_name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/hackathons",
    responses(
        (status = 200, description = "List all hackathons successfully", body = Vec<HackathonResponse>)
    ),
    tag = "hackathons"
)]
pub async fn list_hackathons(
    State(db): State<Database>,
) -> Result<Json<Vec<HackathonResponse>>, WebError> {
    let hackathons = services::list_hackathons(db.pool()).await?;

    let response: Vec<HackathonResponse> = hackathons
        .into_iter()
        .map(HackathonResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Hackathon found", body = HackathonResponse),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn get_hackathon(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let hackathon = services::get_hackathon(db.pool(), id).await?;

    Ok(Json(HackathonResponse::from(hackathon)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/hackathons",
    request_body = CreateHackathonRequest,
    responses(
        (status = 201, description = "Hackathon created successfully", body = HackathonResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Hackathon name already exists")
    ),
    tag = "hackathons"
)]
pub async fn create_hackathon(
    State(db): State<Database>,
    Json(req): Json<CreateHackathonRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let hackathon = services::create_hackathon(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(HackathonResponse::from(hackathon))).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/hackathons/{id}/status",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    request_body = UpdateHackathonStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = HackathonResponse),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn update_hackathon_status(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateHackathonStatusRequest>,
) -> Result<Response, WebError> {
    let status = req.parse_status().map_err(WebError::BadRequest)?;

    let hackathon = services::update_status(db.pool(), id, status).await?;

    Ok(Json(HackathonResponse::from(hackathon)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/hackathons/{id}",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 204, description = "Hackathon and its submissions deleted"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn delete_hackathon(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    services::delete_hackathon(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{id}/evaluate",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Pending submissions evaluated and ranked", body = RankingReport),
        (status = 404, description = "Hackathon not found"),
        (status = 409, description = "Evaluation already running"),
        (status = 502, description = "Evaluation service failed")
    ),
    tag = "hackathons"
)]
pub async fn evaluate_hackathon(
    State(db): State<Database>,
    State(evaluator): State<Arc<dyn SubmissionEvaluator>>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let report = services::evaluate_hackathon(db.pool(), evaluator.as_ref(), id).await?;

    Ok(Json(report).into_response())
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{id}/rank",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Ranks recomputed from stored scores", body = Vec<LeaderboardEntry>),
        (status = 404, description = "Hackathon not found"),
        (status = 422, description = "An evaluated submission has no usable score")
    ),
    tag = "hackathons"
)]
pub async fn rank_hackathon(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<LeaderboardEntry>>, WebError> {
    let leaderboard = services::rank_hackathon(db.pool(), id).await?;

    Ok(Json(leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}/leaderboard",
    params(
        ("id" = i32, Path, description = "Hackathon ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Leaderboard retrieved successfully", body = PaginatedResponse<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Path(id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (entries, total_items) = services::get_leaderboard(db.pool(), id, &pagination).await?;

    Ok(Json(PaginatedResponse::new(entries, &pagination, total_items)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}/analytics",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Aggregates over the evaluated submissions", body = HackathonAnalytics),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn get_hackathon_analytics(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Json<HackathonAnalytics>, WebError> {
    let analytics = services::get_analytics(db.pool(), id).await?;

    Ok(Json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}/results.csv",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "One row per submission, ranked first", content_type = "text/csv", body = String),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn export_hackathon_results(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Response, WebError> {
    let (file_name, csv) = services::export_results(db.pool(), id).await?;

    let disposition = HeaderValue::from_str(&content_disposition("attachment", &file_name))
        .map_err(|e| WebError::InternalServerError(e.to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/hackathons/{id}/submissions",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    responses(
        (status = 200, description = "Submissions of the hackathon", body = Vec<SubmissionResponse>),
        (status = 404, description = "Hackathon not found")
    ),
    tag = "hackathons"
)]
pub async fn list_submissions(
    State(db): State<Database>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<SubmissionResponse>>, WebError> {
    let submissions = services::list_submissions(db.pool(), id).await?;

    Ok(Json(
        submissions
            .into_iter()
            .map(SubmissionResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/hackathons/{id}/submissions",
    params(
        ("id" = i32, Path, description = "Hackathon ID")
    ),
    request_body(content = SubmissionUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission uploaded", body = SubmissionResponse),
        (status = 400, description = "Missing file, bad filename or unsupported format"),
        (status = 404, description = "Hackathon not found"),
        (status = 413, description = "File too large")
    ),
    tag = "hackathons"
)]
pub async fn upload_submission(
    State(db): State<Database>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let form = UploadForm::read(multipart).await?;
    let team_name = form.field("teamName").map(str::to_string);
    let upload = form.into_file()?;

    let hackathon = services::get_hackathon(db.pool(), id).await?;
    let new_submission = services::prepare_submission(&hackathon, team_name.as_deref(), &upload)
        .map_err(WebError::BadRequest)?;

    let submission = services::store_submission(db.pool(), &new_submission, &upload).await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))).into_response())
}
