//! Per-hackathon aggregates over evaluated submissions.

use std::collections::{BTreeMap, HashMap};

use crate::dto::analytics::{CriterionAverage, HackathonAnalytics, KeywordCount, ScoreBucket};
use crate::models::Submission;

const TOP_KEYWORDS: usize = 5;

/// Lower bound and label of each score bucket, highest first.
const SCORE_BUCKETS: [(f64, &str); 5] = [
    (90.0, "90-100"),
    (80.0, "80-89"),
    (70.0, "70-79"),
    (60.0, "60-69"),
    (f64::NEG_INFINITY, "Below 60"),
];

/// Build the analytics of a hackathon from all of its submissions.
///
/// Only evaluated submissions with a score feed the aggregates; the rest only
/// count towards `total_submissions`.
pub fn build_analytics(hackathon_id: i32, submissions: &[Submission]) -> HackathonAnalytics {
    let scored: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.evaluated && s.score.is_some())
        .collect();

    let scores: Vec<f64> = scored.iter().filter_map(|s| s.score).collect();
    let average_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    HackathonAnalytics {
        hackathon_id,
        total_submissions: submissions.len(),
        evaluated_submissions: submissions.iter().filter(|s| s.evaluated).count(),
        average_score,
        score_distribution: score_distribution(&scores),
        criteria_averages: criteria_averages(&scored),
        top_keywords: top_keywords(&scored),
        strengths_count: scored.iter().map(|s| list_len(&s.strengths)).sum(),
        weaknesses_count: scored.iter().map(|s| list_len(&s.weaknesses)).sum(),
    }
}

fn score_distribution(scores: &[f64]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; SCORE_BUCKETS.len()];
    for score in scores {
        if let Some(index) = SCORE_BUCKETS.iter().position(|(lower, _)| score >= lower) {
            counts[index] += 1;
        }
    }

    SCORE_BUCKETS
        .iter()
        .zip(counts)
        .map(|((_, label), count)| ScoreBucket {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn criteria_averages(scored: &[&Submission]) -> Vec<CriterionAverage> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for submission in scored {
        let Some(criteria) = submission.criteria_scores.as_ref() else {
            continue;
        };
        for (name, score) in criteria.0.iter() {
            let entry = totals.entry(name.as_str()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(criterion, (sum, count))| CriterionAverage {
            criterion: criterion.to_string(),
            average: sum / count as f64,
        })
        .collect()
}

fn top_keywords(scored: &[&Submission]) -> Vec<KeywordCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for keyword in scored
        .iter()
        .filter_map(|s| s.keywords.as_ref())
        .flat_map(|k| k.0.iter())
    {
        *counts.entry(keyword.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Alphabetical among equal counts so the cut at five is stable
    ranked.sort_by(|(a_word, a_count), (b_word, b_count)| {
        b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
    });

    ranked
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.to_string(),
            count,
        })
        .collect()
}

fn list_len(list: &Option<sqlx::types::Json<Vec<String>>>) -> usize {
    list.as_ref().map_or(0, |l| l.0.len())
}
