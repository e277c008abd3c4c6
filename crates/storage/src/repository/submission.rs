use sqlx::{PgPool, types::Json};

use crate::dto::submission::{NewSubmission, SubmissionAnalysis, SubmissionEvaluation};
use crate::error::{Result, StorageError};
use crate::models::Submission;

const SUBMISSION_COLUMNS: &str = r#"
    id, hackathon_id, team_name, original_file, file_type, bucket_name, object_key,
    content, score, rank, justification, criteria_scores, summary, keywords,
    strengths, weaknesses, processed, evaluated, created_at
"#;

/// Repository for Submission database operations
pub struct SubmissionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All submissions of a hackathon in ingestion order
    pub async fn list_by_hackathon(&self, hackathon_id: i32) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE hackathon_id = $1 ORDER BY id"
        ))
        .bind(hackathon_id)
        .fetch_all(self.pool)
        .await?;

        Ok(submissions)
    }

    /// Evaluated submissions of a hackathon in ingestion order, the input order
    /// the ranker uses to break ties
    pub async fn list_evaluated(&self, hackathon_id: i32) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions
            WHERE hackathon_id = $1 AND evaluated
            ORDER BY id
            "#
        ))
        .bind(hackathon_id)
        .fetch_all(self.pool)
        .await?;

        Ok(submissions)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, new: &NewSubmission) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            r#"
            INSERT INTO submissions (
                hackathon_id, team_name, original_file, file_type,
                bucket_name, object_key, content, processed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(new.hackathon_id)
        .bind(&new.team_name)
        .bind(&new.original_file)
        .bind(new.file_type.as_str())
        .bind(&new.bucket_name)
        .bind(&new.object_key)
        .bind(&new.content)
        .bind(new.content.is_some())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::NotFound
            } else {
                err
            }
        })
    }

    /// Persist every mutable field of `submission`
    pub async fn save(&self, submission: &Submission) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            r#"
            UPDATE submissions SET
                team_name = $2,
                score = $3,
                rank = $4,
                justification = $5,
                criteria_scores = $6,
                summary = $7,
                keywords = $8,
                strengths = $9,
                weaknesses = $10,
                processed = $11,
                evaluated = $12
            WHERE id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(submission.id)
        .bind(&submission.team_name)
        .bind(submission.score)
        .bind(submission.rank)
        .bind(&submission.justification)
        .bind(&submission.criteria_scores)
        .bind(&submission.summary)
        .bind(&submission.keywords)
        .bind(&submission.strengths)
        .bind(&submission.weaknesses)
        .bind(submission.processed)
        .bind(submission.evaluated)
        .fetch_optional(self.pool)
        .await
        .map_err(map_check_violation)?
        .ok_or(StorageError::NotFound)
    }

    /// Write evaluation results back and mark the submission evaluated
    pub async fn apply_evaluation(
        &self,
        id: i32,
        evaluation: &SubmissionEvaluation,
    ) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            r#"
            UPDATE submissions SET
                score = $2,
                justification = $3,
                criteria_scores = $4,
                summary = $5,
                keywords = $6,
                strengths = $7,
                weaknesses = $8,
                processed = TRUE,
                evaluated = TRUE
            WHERE id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(evaluation.score)
        .bind(&evaluation.justification)
        .bind(Json(&evaluation.criteria_scores))
        .bind(&evaluation.summary)
        .bind(Json(&evaluation.keywords))
        .bind(Json(&evaluation.strengths))
        .bind(Json(&evaluation.weaknesses))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn update_analysis(&self, id: i32, analysis: &SubmissionAnalysis) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            r#"
            UPDATE submissions SET summary = $2, keywords = $3, strengths = $4, weaknesses = $5
            WHERE id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&analysis.summary)
        .bind(Json(&analysis.keywords))
        .bind(Json(&analysis.strengths))
        .bind(Json(&analysis.weaknesses))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Replace the ranks of a hackathon's submissions in one transaction.
    ///
    /// Ranks of evaluated submissions not present in `ranks` are cleared so a
    /// leaderboard never mixes two ranking runs.
    pub async fn replace_ranks(&self, hackathon_id: i32, ranks: &[(i32, i32)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE submissions SET rank = NULL WHERE hackathon_id = $1")
            .bind(hackathon_id)
            .execute(&mut *tx)
            .await?;

        for &(id, rank) in ranks {
            sqlx::query(
                "UPDATE submissions SET rank = $3 WHERE id = $1 AND hackathon_id = $2 AND evaluated",
            )
            .bind(id)
            .bind(hackathon_id)
            .bind(rank)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn map_check_violation(e: sqlx::Error) -> StorageError {
    let err = StorageError::from(e);
    if err.is_check_violation() {
        StorageError::ConstraintViolation(
            "An unevaluated submission cannot carry a score or rank".to_string(),
        )
    } else {
        err
    }
}
