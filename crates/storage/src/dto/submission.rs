use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{FileType, Submission};

/// Full submission record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub hackathon_id: i32,
    pub team_name: String,
    pub original_file: String,
    pub file_type: String,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub rank: Option<i32>,
    pub justification: Option<String>,
    pub criteria_scores: Option<BTreeMap<String, f64>>,
    pub summary: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
    pub processed: bool,
    pub evaluated: bool,
    pub created_at: NaiveDateTime,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            hackathon_id: submission.hackathon_id,
            team_name: submission.team_name,
            original_file: submission.original_file,
            file_type: submission.file_type,
            content: submission.content,
            score: submission.score,
            rank: submission.rank,
            justification: submission.justification,
            criteria_scores: submission.criteria_scores.map(|j| j.0),
            summary: submission.summary,
            keywords: submission.keywords.map(|j| j.0),
            strengths: submission.strengths.map(|j| j.0),
            weaknesses: submission.weaknesses.map(|j| j.0),
            processed: submission.processed,
            evaluated: submission.evaluated,
            created_at: submission.created_at,
        }
    }
}

/// Values for a freshly ingested submission
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub hackathon_id: i32,
    pub team_name: String,
    pub original_file: String,
    pub file_type: FileType,
    pub bucket_name: String,
    pub object_key: String,
    pub content: Option<String>,
}

/// Evaluation results written back onto a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmissionEvaluation {
    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100"))]
    pub score: f64,

    #[serde(default)]
    pub justification: Option<String>,

    #[validate(custom(function = "validate_criteria_scores"))]
    #[serde(default)]
    pub criteria_scores: BTreeMap<String, f64>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// Drill-down analysis of a single submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionAnalysis {
    pub summary: String,
    pub keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl SubmissionAnalysis {
    /// Stored analysis, if every part of it has been recorded.
    pub fn from_submission(submission: &Submission) -> Option<Self> {
        Some(Self {
            summary: submission.summary.clone()?,
            keywords: submission.keywords.as_ref()?.0.clone(),
            strengths: submission.strengths.as_ref()?.0.clone(),
            weaknesses: submission.weaknesses.as_ref()?.0.clone(),
        })
    }
}

/// Request payload for a manual submission update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSubmissionRequest {
    #[validate(length(min = 1, max = 255))]
    pub team_name: Option<String>,

    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100"))]
    pub score: Option<f64>,

    #[validate(range(min = 1, message = "Rank must be a positive integer"))]
    pub rank: Option<i32>,

    pub justification: Option<String>,

    #[validate(custom(function = "validate_criteria_scores"))]
    pub criteria_scores: Option<BTreeMap<String, f64>>,

    pub summary: Option<String>,

    pub keywords: Option<Vec<String>>,

    pub strengths: Option<Vec<String>>,

    pub weaknesses: Option<Vec<String>>,

    pub processed: Option<bool>,

    pub evaluated: Option<bool>,
}

impl UpdateSubmissionRequest {
    /// Merges the request into `submission`.
    ///
    /// Setting `evaluated` to false resets the score and rank unless the same
    /// request supplies them, which is rejected.
    pub fn apply_to(&self, submission: &mut Submission) -> Result<(), String> {
        if self.evaluated == Some(false) && (self.score.is_some() || self.rank.is_some()) {
            return Err("an unevaluated submission cannot carry a score or rank".to_string());
        }

        if let Some(ref team_name) = self.team_name {
            submission.team_name = team_name.clone();
        }
        if let Some(evaluated) = self.evaluated {
            submission.evaluated = evaluated;
            if !evaluated {
                submission.score = None;
                submission.rank = None;
            }
        }
        if let Some(score) = self.score {
            submission.score = Some(score);
        }
        if let Some(rank) = self.rank {
            submission.rank = Some(rank);
        }
        if let Some(ref justification) = self.justification {
            submission.justification = Some(justification.clone());
        }
        if let Some(ref criteria_scores) = self.criteria_scores {
            submission.criteria_scores = Some(Json(criteria_scores.clone()));
        }
        if let Some(ref summary) = self.summary {
            submission.summary = Some(summary.clone());
        }
        if let Some(ref keywords) = self.keywords {
            submission.keywords = Some(Json(keywords.clone()));
        }
        if let Some(ref strengths) = self.strengths {
            submission.strengths = Some(Json(strengths.clone()));
        }
        if let Some(ref weaknesses) = self.weaknesses {
            submission.weaknesses = Some(Json(weaknesses.clone()));
        }
        if let Some(processed) = self.processed {
            submission.processed = processed;
        }

        submission.check_evaluation_state()
    }
}

fn validate_criteria_scores(scores: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
    let out_of_range = scores
        .values()
        .any(|score| !score.is_finite() || !(0.0..=10.0).contains(score));

    if out_of_range {
        let mut error = ValidationError::new("criteria_score_range");
        error.message = Some("Criterion scores must be between 0 and 10".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unevaluated() -> Submission {
        Submission {
            id: 11,
            hackathon_id: 2,
            team_name: "EcoTech".to_string(),
            original_file: "EcoTech_GreenHack.txt".to_string(),
            file_type: "text".to_string(),
            bucket_name: "text-bucket".to_string(),
            object_key: "abc-EcoTech_GreenHack.txt".to_string(),
            content: None,
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
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_score_without_evaluated_flag_rejected() {
        let mut submission = unevaluated();
        let req = UpdateSubmissionRequest {
            score: Some(55.0),
            ..Default::default()
        };
        assert!(req.apply_to(&mut submission).is_err());
    }

    #[test]
    fn test_marking_evaluated_with_score() {
        let mut submission = unevaluated();
        let req = UpdateSubmissionRequest {
            score: Some(55.0),
            evaluated: Some(true),
            keywords: Some(vec!["solar".to_string()]),
            ..Default::default()
        };
        req.apply_to(&mut submission).unwrap();
        assert_eq!(submission.score, Some(55.0));
        assert!(submission.evaluated);
        assert_eq!(submission.keywords, Some(Json(vec!["solar".to_string()])));
    }

    #[test]
    fn test_reset_evaluation_clears_score_and_rank() {
        let mut submission = unevaluated();
        submission.evaluated = true;
        submission.score = Some(81.0);
        submission.rank = Some(2);

        let req = UpdateSubmissionRequest {
            evaluated: Some(false),
            ..Default::default()
        };
        req.apply_to(&mut submission).unwrap();
        assert_eq!(submission.score, None);
        assert_eq!(submission.rank, None);
    }

    #[test]
    fn test_reset_with_score_in_same_request_rejected() {
        let mut submission = unevaluated();
        let req = UpdateSubmissionRequest {
            evaluated: Some(false),
            rank: Some(1),
            ..Default::default()
        };
        assert!(req.apply_to(&mut submission).is_err());
    }

    #[test]
    fn test_criteria_scores_range() {
        let evaluation = SubmissionEvaluation {
            score: 72.0,
            justification: None,
            criteria_scores: BTreeMap::from([("Impact".to_string(), 11.5)]),
            summary: None,
            keywords: vec![],
            strengths: vec![],
            weaknesses: vec![],
        };
        assert!(evaluation.validate().is_err());

        let evaluation = SubmissionEvaluation {
            criteria_scores: BTreeMap::from([("Impact".to_string(), 7.5)]),
            ..evaluation
        };
        assert!(evaluation.validate().is_ok());
    }

    #[test]
    fn test_score_range() {
        let req = UpdateSubmissionRequest {
            score: Some(120.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_analysis_requires_all_parts() {
        let mut submission = unevaluated();
        submission.summary = Some("Solar purifier".to_string());
        submission.keywords = Some(Json(vec!["solar".to_string()]));
        assert_eq!(SubmissionAnalysis::from_submission(&submission), None);

        submission.strengths = Some(Json(vec![]));
        submission.weaknesses = Some(Json(vec!["cost".to_string()]));
        let analysis = SubmissionAnalysis::from_submission(&submission).unwrap();
        assert_eq!(analysis.summary, "Solar purifier");
        assert_eq!(analysis.weaknesses, vec!["cost".to_string()]);
    }
}
