use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Submission;

/// One row of a hackathon leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub submission_id: i32,
    pub team_name: String,
    pub score: f64,
    pub criteria_scores: BTreeMap<String, f64>,
    pub file_type: String,
}

impl LeaderboardEntry {
    /// Builds an entry from a ranked submission; `None` if it has no rank or score.
    pub fn from_ranked(submission: &Submission) -> Option<Self> {
        Some(Self {
            rank: submission.rank?,
            submission_id: submission.id,
            team_name: submission.team_name.clone(),
            score: submission.score?,
            criteria_scores: submission
                .criteria_scores
                .as_ref()
                .map(|j| j.0.clone())
                .unwrap_or_default(),
            file_type: submission.file_type.clone(),
        })
    }
}

/// Outcome of an evaluation or re-ranking run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankingReport {
    pub hackathon_id: i32,
    pub evaluated: usize,
    pub failed: Vec<EvaluationFailure>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluationFailure {
    pub submission_id: i32,
    pub team_name: String,
    pub reason: String,
}
