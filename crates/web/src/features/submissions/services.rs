use sqlx::PgPool;
use storage::{
    dto::submission::{SubmissionAnalysis, UpdateSubmissionRequest},
    error::Result,
    models::Submission,
    repository::{object::ObjectRepository, submission::SubmissionRepository},
    services::leaderboard::rerank_hackathon,
};

use evaluator::{EvaluationPipeline, SubmissionEvaluator};

use crate::error::WebError;

pub async fn get_submission(pool: &PgPool, id: i32) -> Result<Submission> {
    let repo = SubmissionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Apply a manual correction to a submission.
///
/// Score or evaluation changes re-rank the hackathon unless the request pins
/// an explicit rank.
pub async fn update_submission(
    pool: &PgPool,
    id: i32,
    request: &UpdateSubmissionRequest,
) -> std::result::Result<Submission, WebError> {
    let repo = SubmissionRepository::new(pool);

    let mut submission = repo.find_by_id(id).await?;
    apply_correction(request, &mut submission)?;

    let updated = repo.save(&submission).await?;

    let affects_ranking = request.score.is_some() || request.evaluated.is_some();
    if affects_ranking && request.rank.is_none() {
        rerank_hackathon(pool, updated.hackathon_id).await?;
        return Ok(repo.find_by_id(id).await?);
    }

    Ok(updated)
}

/// Merge a correction into a loaded submission; an inconsistent result is a bad request
fn apply_correction(
    request: &UpdateSubmissionRequest,
    submission: &mut Submission,
) -> std::result::Result<(), WebError> {
    request.apply_to(submission).map_err(WebError::BadRequest)
}

/// Delete a submission and its stored artifact
pub async fn delete_submission(pool: &PgPool, id: i32) -> Result<()> {
    let repo = SubmissionRepository::new(pool);
    let submission = repo.find_by_id(id).await?;

    repo.delete(id).await?;

    if let Err(e) = ObjectRepository::new(pool)
        .remove(&submission.bucket_name, &submission.object_key)
        .await
    {
        tracing::warn!(
            "Failed to remove artifact of submission {}: {}",
            submission.id,
            e
        );
    }

    if submission.rank.is_some() {
        rerank_hackathon(pool, submission.hackathon_id).await?;
    }

    Ok(())
}

pub async fn get_analysis(
    pool: &PgPool,
    evaluator: &dyn SubmissionEvaluator,
    id: i32,
) -> evaluator::Result<SubmissionAnalysis> {
    EvaluationPipeline::new(pool, evaluator)
        .analyze_submission(id)
        .await
}
