//! Standard competition ranking ("1224" ranking) over scored submissions.
//!
//! Submissions are ordered by descending score. Equal scores share a rank and
//! the next lower score resumes at its 1-based position, so rank values may
//! skip. The sort is stable: tied submissions keep their input order.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error("submission {id} has no score")]
    MissingScore { id: i32 },

    #[error("submission {id} has a non-numeric score ({score})")]
    NonNumericScore { id: i32, score: f64 },
}

impl RankingError {
    /// Id of the submission that could not be ranked.
    pub fn submission_id(&self) -> i32 {
        match self {
            Self::MissingScore { id } | Self::NonNumericScore { id, .. } => *id,
        }
    }
}

/// A record the ranker can order and annotate.
pub trait Rankable {
    fn ranking_id(&self) -> i32;

    fn ranking_score(&self) -> Option<f64>;

    fn assign_rank(&mut self, rank: i32);
}

/// Sorts `items` by descending score and assigns competition ranks.
///
/// Every item must carry a finite score; the first one that does not is
/// reported by id and nothing is ranked.
pub fn rank_submissions<T: Rankable>(items: Vec<T>) -> Result<Vec<T>, RankingError> {
    let mut scored = Vec::with_capacity(items.len());
    for item in items {
        let score = validated_score(&item)?;
        scored.push((score, item));
    }

    // Scores are finite here, so `partial_cmp` never fails and treats -0.0
    // and 0.0 as equal. `sort_by` is stable, which keeps tie order deterministic.
    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let mut previous: Option<(f64, i32)> = None;
    let ranked = scored
        .into_iter()
        .enumerate()
        .map(|(index, (score, mut item))| {
            let rank = match previous {
                Some((previous_score, previous_rank)) if previous_score == score => previous_rank,
                _ => index as i32 + 1,
            };
            previous = Some((score, rank));
            item.assign_rank(rank);
            item
        })
        .collect();

    Ok(ranked)
}

fn validated_score<T: Rankable>(item: &T) -> Result<f64, RankingError> {
    let id = item.ranking_id();
    match item.ranking_score() {
        None => Err(RankingError::MissingScore { id }),
        Some(score) if !score.is_finite() => Err(RankingError::NonNumericScore { id, score }),
        Some(score) => Ok(score),
    }
}
