use base64::{Engine as _, engine::general_purpose::STANDARD};
use sqlx::PgPool;
use storage::{
    dto::{
        ranking::{EvaluationFailure, RankingReport},
        submission::SubmissionAnalysis,
    },
    error::StorageError,
    models::{Hackathon, HackathonStatus, Submission},
    repository::{
        hackathon::HackathonRepository, object::ObjectRepository,
        submission::SubmissionRepository,
    },
    services::leaderboard::{leaderboard_of, rerank_hackathon},
};

use crate::models::{AnalysisRequest, EvaluationRequest};
use crate::traits::SubmissionEvaluator;
use crate::validator::EvaluationValidator;
use crate::{EvaluatorError, Result};

/// Drives a hackathon through evaluation: score pending submissions, then rank.
pub struct EvaluationPipeline<'a> {
    pool: &'a PgPool,
    evaluator: &'a dyn SubmissionEvaluator,
}

impl<'a> EvaluationPipeline<'a> {
    pub fn new(pool: &'a PgPool, evaluator: &'a dyn SubmissionEvaluator) -> Self {
        Self { pool, evaluator }
    }

    /// Evaluate every pending submission of a hackathon and rank the results.
    ///
    /// Only one evaluation may hold a hackathon at a time. A submission the
    /// service fails on is logged and skipped. Any other failure puts the
    /// hackathon back to `in_progress`.
    pub async fn evaluate_hackathon(&self, hackathon_id: i32) -> Result<RankingReport> {
        let hackathons = HackathonRepository::new(self.pool);
        let hackathon = hackathons.begin_evaluation(hackathon_id).await?;
        tracing::info!("Evaluation started for hackathon: {}", hackathon.name);

        let outcome = match self.run(&hackathon).await {
            Ok(report) => hackathons
                .update_status(hackathon_id, HackathonStatus::Completed)
                .await
                .map(|_| report)
                .map_err(EvaluatorError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(report) => {
                tracing::info!(
                    "Evaluation completed for hackathon: {} ({} evaluated, {} failed)",
                    hackathon.name,
                    report.evaluated,
                    report.failed.len()
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Failed to process hackathon submissions: {}", e);
                if let Err(status_err) = hackathons
                    .update_status(hackathon_id, HackathonStatus::InProgress)
                    .await
                {
                    tracing::error!(
                        "Failed to reset status of hackathon {}: {}",
                        hackathon_id,
                        status_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn run(&self, hackathon: &Hackathon) -> Result<RankingReport> {
        let submissions = SubmissionRepository::new(self.pool)
            .list_by_hackathon(hackathon.id)
            .await?;

        let pending: Vec<Submission> = submissions.into_iter().filter(|s| !s.evaluated).collect();
        if pending.is_empty() {
            tracing::info!("No pending submissions for hackathon: {}", hackathon.name);
        }

        let mut evaluated = 0;
        let mut failed = Vec::new();

        for submission in &pending {
            match self.evaluate_submission(hackathon, submission).await {
                Ok(()) => evaluated += 1,
                Err(EvaluatorError::StorageError(e)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(
                        "Skipping submission {} ({}): {}",
                        submission.id,
                        submission.team_name,
                        e
                    );
                    failed.push(EvaluationFailure {
                        submission_id: submission.id,
                        team_name: submission.team_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let ranked = rerank_hackathon(self.pool, hackathon.id).await?;

        Ok(RankingReport {
            hackathon_id: hackathon.id,
            evaluated,
            failed,
            leaderboard: leaderboard_of(&ranked),
        })
    }

    async fn evaluate_submission(&self, hackathon: &Hackathon, submission: &Submission) -> Result<()> {
        let artifact = if submission.content.is_some() {
            None
        } else {
            match ObjectRepository::new(self.pool)
                .get(&submission.bucket_name, &submission.object_key)
                .await
            {
                Ok(object) => Some(object.data),
                Err(StorageError::NotFound) => {
                    return Err(EvaluatorError::NotReady(format!(
                        "artifact {}/{} is missing",
                        submission.bucket_name, submission.object_key
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        };

        let request = evaluation_request(hackathon, submission, artifact.as_deref());
        let evaluation = self.evaluator.evaluate(&request).await?;

        let report = EvaluationValidator::validate(&evaluation, hackathon.criteria())?;
        report.log_warnings(submission.id);

        SubmissionRepository::new(self.pool)
            .apply_evaluation(submission.id, &evaluation)
            .await?;

        Ok(())
    }

    /// Stored analysis of an evaluated submission, requested from the service
    /// and persisted the first time it is asked for.
    pub async fn analyze_submission(&self, submission_id: i32) -> Result<SubmissionAnalysis> {
        let repo = SubmissionRepository::new(self.pool);
        let submission = repo.find_by_id(submission_id).await?;

        if !submission.evaluated {
            return Err(EvaluatorError::NotReady(
                "Submission has not been evaluated yet".to_string(),
            ));
        }

        if let Some(analysis) = SubmissionAnalysis::from_submission(&submission) {
            return Ok(analysis);
        }

        let analysis = self
            .evaluator
            .analyze(&AnalysisRequest {
                submission_id: submission.id,
                team_name: submission.team_name.clone(),
                file_type: submission.file_type.clone(),
                content: submission.content.clone(),
                justification: submission.justification.clone(),
            })
            .await?;

        repo.update_analysis(submission.id, &analysis).await?;

        Ok(analysis)
    }
}

/// Builds the service payload; `artifact` is only used when there is no text content.
pub fn evaluation_request(
    hackathon: &Hackathon,
    submission: &Submission,
    artifact: Option<&[u8]>,
) -> EvaluationRequest {
    let file_base64 = match submission.content {
        Some(_) => None,
        None => artifact.map(|data| STANDARD.encode(data)),
    };

    EvaluationRequest {
        submission_id: submission.id,
        team_name: submission.team_name.clone(),
        hackathon_name: hackathon.name.clone(),
        theme: hackathon.theme.clone(),
        criteria: hackathon.criteria().to_vec(),
        file_type: submission.file_type.clone(),
        original_file: submission.original_file.clone(),
        content: submission.content.clone(),
        file_base64,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use sqlx::types::Json;
    use storage::{
        Database,
        dto::{
            hackathon::CreateHackathonRequest,
            submission::{NewSubmission, SubmissionEvaluation},
        },
        models::{Criterion, FileType},
    };

    use super::*;

    fn hackathon() -> Hackathon {
        Hackathon {
            id: 3,
            name: "GreenHack".to_string(),
            theme: "Sustainability".to_string(),
            description: String::new(),
            criteria: Json(vec![Criterion {
                name: "Impact".to_string(),
                description: String::new(),
                weightage: 100.0,
            }]),
            status: "in_progress".to_string(),
            created_at: Default::default(),
        }
    }

    fn submission(content: Option<&str>) -> Submission {
        Submission {
            id: 9,
            hackathon_id: 3,
            team_name: "Alpha".to_string(),
            original_file: "Alpha_GreenHack.pdf".to_string(),
            file_type: "pdf".to_string(),
            bucket_name: "pdf-bucket".to_string(),
            object_key: "k-Alpha_GreenHack.pdf".to_string(),
            content: content.map(str::to_string),
            score: None,
            rank: None,
            justification: None,
            criteria_scores: None,
            summary: None,
            keywords: None,
            strengths: None,
            weaknesses: None,
            processed: false,
            evaluated: false,
            created_at: Default::default(),
        }
    }

    #[test]
    fn test_binary_artifact_sent_as_base64() {
        let request = evaluation_request(&hackathon(), &submission(None), Some(b"%PDF"));
        assert_eq!(request.file_base64.as_deref(), Some("JVBERg=="));
        assert_eq!(request.content, None);
        assert_eq!(request.criteria.len(), 1);
        assert_eq!(request.theme, "Sustainability");
    }

    #[test]
    fn test_text_content_takes_precedence() {
        let request =
            evaluation_request(&hackathon(), &submission(Some("solar pump")), Some(b"ignored"));
        assert_eq!(request.content.as_deref(), Some("solar pump"));
        assert_eq!(request.file_base64, None);

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("file_base64").is_none());
    }

    /// Scores by team name; teams absent from the table fail.
    struct ScriptedEvaluator {
        scores: BTreeMap<String, f64>,
        calls: Mutex<Vec<i32>>,
    }

    #[async_trait::async_trait]
    impl SubmissionEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, request: &EvaluationRequest) -> Result<SubmissionEvaluation> {
            self.calls.lock().unwrap().push(request.submission_id);
            let score = self.scores.get(&request.team_name).copied().ok_or_else(|| {
                EvaluatorError::ServiceError(format!("no score for {}", request.team_name))
            })?;

            Ok(SubmissionEvaluation {
                score,
                justification: Some("scripted".to_string()),
                criteria_scores: BTreeMap::from([("Impact".to_string(), score / 10.0)]),
                summary: Some(format!("{} summary", request.team_name)),
                keywords: vec!["scripted".to_string()],
                strengths: vec![],
                weaknesses: vec![],
            })
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> Result<SubmissionAnalysis> {
            Ok(SubmissionAnalysis {
                summary: "analysed".to_string(),
                keywords: vec![],
                strengths: vec!["focus".to_string()],
                weaknesses: vec![],
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    #[ignore] // Only run against a migrated database in DATABASE_URL
    async fn test_evaluate_hackathon_ranks_and_skips_failures() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        let pool = db.pool();

        let hackathon = HackathonRepository::new(pool)
            .create(&CreateHackathonRequest {
                name: format!("pipeline-{}", std::process::id()),
                theme: "Testing".to_string(),
                description: String::new(),
                criteria: hackathon().criteria.0,
                status: Some(HackathonStatus::InProgress),
            })
            .await
            .unwrap();

        let repo = SubmissionRepository::new(pool);
        for team in ["alpha", "beta", "gamma", "broken"] {
            repo.create(&NewSubmission {
                hackathon_id: hackathon.id,
                team_name: team.to_string(),
                original_file: format!("{}_{}.txt", team, hackathon.name),
                file_type: FileType::Text,
                bucket_name: FileType::Text.bucket_name(),
                object_key: format!("{}-{}", hackathon.id, team),
                content: Some(format!("{} proposal", team)),
            })
            .await
            .unwrap();
        }

        let evaluator = ScriptedEvaluator {
            scores: BTreeMap::from([
                ("alpha".to_string(), 90.0),
                ("beta".to_string(), 90.0),
                ("gamma".to_string(), 70.0),
            ]),
            calls: Mutex::new(Vec::new()),
        };

        let pipeline = EvaluationPipeline::new(pool, &evaluator);
        let report = pipeline.evaluate_hackathon(hackathon.id).await.unwrap();

        assert_eq!(report.evaluated, 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].team_name, "broken");

        let ranks: Vec<(String, i32)> = report
            .leaderboard
            .iter()
            .map(|e| (e.team_name.clone(), e.rank))
            .collect();
        assert_eq!(
            ranks,
            vec![
                ("alpha".to_string(), 1),
                ("beta".to_string(), 1),
                ("gamma".to_string(), 3)
            ]
        );

        let status = HackathonRepository::new(pool)
            .find_by_id(hackathon.id)
            .await
            .unwrap()
            .status;
        assert_eq!(status, "completed");

        let first_id = report.leaderboard[0].submission_id;
        let analysis = pipeline.analyze_submission(first_id).await.unwrap();
        assert_eq!(analysis.summary, "analysed");

        HackathonRepository::new(pool)
            .delete(hackathon.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore] // Only run against a migrated database in DATABASE_URL
    async fn test_evaluate_rejected_while_already_evaluating() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        let pool = db.pool();

        let hackathon = HackathonRepository::new(pool)
            .create(&CreateHackathonRequest {
                name: format!("busy-{}", std::process::id()),
                theme: "Testing".to_string(),
                description: String::new(),
                criteria: vec![],
                status: Some(HackathonStatus::Evaluating),
            })
            .await
            .unwrap();

        SubmissionRepository::new(pool)
            .create(&NewSubmission {
                hackathon_id: hackathon.id,
                team_name: "alpha".to_string(),
                original_file: format!("alpha_{}.txt", hackathon.name),
                file_type: FileType::Text,
                bucket_name: FileType::Text.bucket_name(),
                object_key: format!("{}-alpha", hackathon.id),
                content: Some("alpha proposal".to_string()),
            })
            .await
            .unwrap();

        let evaluator = ScriptedEvaluator {
            scores: BTreeMap::from([("alpha".to_string(), 80.0)]),
            calls: Mutex::new(Vec::new()),
        };

        let result = EvaluationPipeline::new(pool, &evaluator)
            .evaluate_hackathon(hackathon.id)
            .await;

        assert!(matches!(
            result,
            Err(EvaluatorError::StorageError(StorageError::ConstraintViolation(_)))
        ));
        assert!(evaluator.calls.lock().unwrap().is_empty());

        // The running evaluation keeps its claim
        let status = HackathonRepository::new(pool)
            .find_by_id(hackathon.id)
            .await
            .unwrap()
            .status;
        assert_eq!(status, "evaluating");

        HackathonRepository::new(pool)
            .delete(hackathon.id)
            .await
            .unwrap();
    }
}
