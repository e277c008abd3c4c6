use sqlx::PgPool;
use storage::{
    dto::{
        analytics::HackathonAnalytics,
        common::PaginationParams,
        hackathon::CreateHackathonRequest,
        ranking::{LeaderboardEntry, RankingReport},
        submission::NewSubmission,
    },
    error::Result,
    models::{FileType, Hackathon, HackathonStatus, Submission},
    repository::{
        hackathon::HackathonRepository, object::ObjectRepository, ranking::RankingRepository,
        submission::SubmissionRepository,
    },
    services::{
        analytics::build_analytics,
        export::results_csv,
        ingest::{extract_team_name, object_key_for},
        leaderboard::{leaderboard_of, rerank_hackathon},
    },
};

use evaluator::{EvaluationPipeline, SubmissionEvaluator};

use crate::features::upload::UploadedFile;

/// List all hackathons
pub async fn list_hackathons(pool: &PgPool) -> Result<Vec<Hackathon>> {
    let repo = HackathonRepository::new(pool);
    repo.list().await
}

/// Get hackathon by id
pub async fn get_hackathon(pool: &PgPool, id: i32) -> Result<Hackathon> {
    let repo = HackathonRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new hackathon
pub async fn create_hackathon(pool: &PgPool, request: &CreateHackathonRequest) -> Result<Hackathon> {
    let repo = HackathonRepository::new(pool);
    let hackathon = repo.create(request).await?;
    tracing::info!("Created hackathon {} ({})", hackathon.name, hackathon.id);
    Ok(hackathon)
}

pub async fn update_status(pool: &PgPool, id: i32, status: HackathonStatus) -> Result<Hackathon> {
    let repo = HackathonRepository::new(pool);
    repo.update_status(id, status).await
}

/// Delete a hackathon, its submissions and their stored artifacts
pub async fn delete_hackathon(pool: &PgPool, id: i32) -> Result<()> {
    let submissions = SubmissionRepository::new(pool).list_by_hackathon(id).await?;

    HackathonRepository::new(pool).delete(id).await?;

    let objects = ObjectRepository::new(pool);
    for submission in submissions {
        if let Err(e) = objects
            .remove(&submission.bucket_name, &submission.object_key)
            .await
        {
            tracing::warn!(
                "Failed to remove artifact {}/{}: {}",
                submission.bucket_name,
                submission.object_key,
                e
            );
        }
    }

    Ok(())
}

/// Evaluate pending submissions and rank the hackathon.
///
/// Fails with a conflict when an evaluation of the hackathon is already running.
pub async fn evaluate_hackathon(
    pool: &PgPool,
    evaluator: &dyn SubmissionEvaluator,
    id: i32,
) -> evaluator::Result<RankingReport> {
    EvaluationPipeline::new(pool, evaluator)
        .evaluate_hackathon(id)
        .await
}

/// Recompute ranks from stored scores
pub async fn rank_hackathon(pool: &PgPool, id: i32) -> Result<Vec<LeaderboardEntry>> {
    let ranked = rerank_hackathon(pool, id).await?;
    Ok(leaderboard_of(&ranked))
}

pub async fn get_leaderboard(
    pool: &PgPool,
    id: i32,
    pagination: &PaginationParams,
) -> Result<(Vec<LeaderboardEntry>, i64)> {
    HackathonRepository::new(pool).find_by_id(id).await?;
    RankingRepository::new(pool)
        .get_leaderboard(id, pagination)
        .await
}

pub async fn list_submissions(pool: &PgPool, id: i32) -> Result<Vec<Submission>> {
    HackathonRepository::new(pool).find_by_id(id).await?;
    SubmissionRepository::new(pool).list_by_hackathon(id).await
}

/// Score distribution, criterion averages and keyword stats of a hackathon
pub async fn get_analytics(pool: &PgPool, id: i32) -> Result<HackathonAnalytics> {
    let submissions = list_submissions(pool, id).await?;
    Ok(build_analytics(id, &submissions))
}

/// Results sheet of a hackathon as CSV, with the name to download it under
pub async fn export_results(pool: &PgPool, id: i32) -> Result<(String, Vec<u8>)> {
    let hackathon = HackathonRepository::new(pool).find_by_id(id).await?;
    let submissions = SubmissionRepository::new(pool).list_by_hackathon(id).await?;

    let csv = results_csv(&submissions)?;
    tracing::info!(
        "Exported {} result rows for hackathon {}",
        submissions.len(),
        hackathon.name
    );

    Ok((format!("{}_Results.csv", hackathon.name), csv))
}

/// Checks an uploaded artifact against a hackathon and derives its submission row.
///
/// The team name comes from the form when given, otherwise from a filename of
/// the form `<team>_<hackathon>.<ext>`. Text artifacts have their content captured.
pub fn prepare_submission(
    hackathon: &Hackathon,
    team_name: Option<&str>,
    upload: &UploadedFile,
) -> std::result::Result<NewSubmission, String> {
    let file_type = FileType::from_filename(&upload.file_name)
        .ok_or_else(|| format!("Unsupported file type: {}", upload.file_name))?;

    let team_name = match team_name {
        Some(name) => name.to_string(),
        None => extract_team_name(&upload.file_name, &hackathon.name)?,
    };

    let content = if file_type.is_text() {
        let text = std::str::from_utf8(&upload.data)
            .map_err(|_| format!("{} is not valid UTF-8 text", upload.file_name))?;
        Some(text.to_string())
    } else {
        None
    };

    Ok(NewSubmission {
        hackathon_id: hackathon.id,
        team_name,
        original_file: upload.file_name.clone(),
        file_type,
        bucket_name: file_type.bucket_name(),
        object_key: object_key_for(&upload.file_name),
        content,
    })
}

/// Store the artifact, then record the submission
pub async fn store_submission(
    pool: &PgPool,
    submission: &NewSubmission,
    upload: &UploadedFile,
) -> Result<Submission> {
    let objects = ObjectRepository::new(pool);
    let content_type = upload
        .content_type
        .as_deref()
        .unwrap_or(submission.file_type.default_mime_type());

    objects
        .put(
            &submission.bucket_name,
            &submission.object_key,
            content_type,
            &upload.data,
        )
        .await?;

    match SubmissionRepository::new(pool).create(submission).await {
        Ok(created) => {
            tracing::info!(
                "Stored submission {} from team {} ({} bytes)",
                created.id,
                created.team_name,
                upload.size()
            );
            Ok(created)
        }
        Err(e) => {
            if let Err(cleanup) = objects
                .remove(&submission.bucket_name, &submission.object_key)
                .await
            {
                tracing::warn!("Failed to remove orphaned artifact: {}", cleanup);
            }
            Err(e)
        }
    }
}
