use std::collections::BTreeMap;

use sqlx::{FromRow, types::Json};

use crate::services::ranking::Rankable;

/// A team's uploaded artifact plus its evaluation metadata.
///
/// An unevaluated submission never carries a score or a rank; the database
/// enforces the same rule with a check constraint.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Submission {
    pub id: i32,
    pub hackathon_id: i32,
    pub team_name: String,
    pub original_file: String,
    pub file_type: String,
    pub bucket_name: String,
    pub object_key: String,
    pub content: Option<String>,
    pub score: Option<f64>,
    pub rank: Option<i32>,
    pub justification: Option<String>,
    pub criteria_scores: Option<Json<BTreeMap<String, f64>>>,
    pub summary: Option<String>,
    pub keywords: Option<Json<Vec<String>>>,
    pub strengths: Option<Json<Vec<String>>>,
    pub weaknesses: Option<Json<Vec<String>>>,
    pub processed: bool,
    pub evaluated: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Submission {
    pub fn check_evaluation_state(&self) -> Result<(), String> {
        if self.evaluated {
            if self.score.is_none() {
                return Err(format!(
                    "submission {} is marked evaluated but has no score",
                    self.id
                ));
            }
        } else if self.score.is_some() || self.rank.is_some() {
            return Err(format!(
                "submission {} is not evaluated and cannot carry a score or rank",
                self.id
            ));
        }
        Ok(())
    }
}

impl Rankable for Submission {
    fn ranking_id(&self) -> i32 {
        self.id
    }

    fn ranking_score(&self) -> Option<f64> {
        self.score
    }

    fn assign_rank(&mut self, rank: i32) {
        self.rank = Some(rank);
    }
}

#[cfg(test)]
mod fixtures {
    use super::*;

    pub fn submission(id: i32, score: Option<f64>) -> Submission {
        Submission {
            id,
            hackathon_id: 1,
            team_name: format!("Team {}", id),
            original_file: format!("team{}_demo.txt", id),
            file_type: "text".to_string(),
            bucket_name: "text-bucket".to_string(),
            object_key: format!("key-{}", id),
            content: Some("content".to_string()),
            score,
            rank: None,
            justification: None,
            criteria_scores: None,
            summary: None,
            keywords: None,
            strengths: None,
            weaknesses: None,
            processed: score.is_some(),
            evaluated: score.is_some(),
            created_at: chrono::NaiveDateTime::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::submission;
    use crate::services::ranking::rank_submissions;

    #[test]
    fn test_unevaluated_with_score_rejected() {
        let mut sub = submission(3, None);
        assert!(sub.check_evaluation_state().is_ok());

        sub.rank = Some(2);
        assert!(sub.check_evaluation_state().is_err());
    }

    #[test]
    fn test_evaluated_requires_score() {
        let mut sub = submission(4, Some(70.0));
        assert!(sub.check_evaluation_state().is_ok());

        sub.score = None;
        assert!(sub.check_evaluation_state().is_err());
    }

    #[test]
    fn test_submissions_rank_through_ranker() {
        let ranked = rank_submissions(vec![
            submission(1, Some(90.0)),
            submission(2, Some(90.0)),
            submission(3, Some(70.0)),
        ])
        .unwrap();

        let ranks: Vec<(i32, Option<i32>)> = ranked.iter().map(|s| (s.id, s.rank)).collect();
        assert_eq!(ranks, vec![(1, Some(1)), (2, Some(1)), (3, Some(3))]);
        assert_eq!(ranked[2].team_name, "Team 3");
    }
}
