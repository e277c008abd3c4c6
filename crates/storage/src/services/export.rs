//! Results sheet of a hackathon as CSV.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::Submission;

const NOT_AVAILABLE: &str = "N/A";

const FIXED_COLUMNS: [&str; 7] = [
    "TeamName",
    "Keywords",
    "Summary",
    "Strengths",
    "Weaknesses",
    "Score",
    "Rank",
];

/// Render one row per submission, ranked ones first in rank order.
///
/// Every criterion seen on any submission gets a `Criteria: <name>` column;
/// submissions without a score for it leave the cell empty.
pub fn results_csv(submissions: &[Submission]) -> Result<Vec<u8>> {
    let criteria: BTreeSet<&str> = submissions
        .iter()
        .filter_map(|s| s.criteria_scores.as_ref())
        .flat_map(|c| c.0.keys().map(String::as_str))
        .collect();

    let mut rows: Vec<&Submission> = submissions.iter().collect();
    rows.sort_by_key(|s| (s.rank.is_none(), s.rank, s.id));

    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(criteria.iter().map(|name| format!("Criteria: {}", name)));
    writer.write_record(header)?;

    for submission in rows {
        let mut record = vec![
            submission.team_name.clone(),
            joined(&submission.keywords),
            submission
                .summary
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            joined(&submission.strengths),
            joined(&submission.weaknesses),
            submission
                .score
                .map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string()),
            submission
                .rank
                .map_or_else(|| NOT_AVAILABLE.to_string(), |r| r.to_string()),
        ];
        for name in &criteria {
            let cell = submission
                .criteria_scores
                .as_ref()
                .and_then(|c| c.0.get(*name))
                .map(|score| score.to_string())
                .unwrap_or_default();
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}

fn joined(list: &Option<sqlx::types::Json<Vec<String>>>) -> String {
    match list {
        Some(items) if !items.0.is_empty() => items.0.join(", "),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sqlx::types::Json;

    use super::*;

    fn submission(id: i32, team: &str, score: Option<f64>, rank: Option<i32>) -> Submission {
        Submission {
            id,
            hackathon_id: 2,
            team_name: team.to_string(),
            original_file: format!("{}_Hack.txt", team),
            file_type: "text".to_string(),
            bucket_name: "text-bucket".to_string(),
            object_key: format!("key-{}", id),
            content: None,
            score,
            rank,
            justification: None,
            criteria_scores: None,
            summary: None,
            keywords: None,
            strengths: None,
            weaknesses: None,
            processed: score.is_some(),
            evaluated: score.is_some(),
            created_at: Default::default(),
        }
    }

    fn lines(csv: Vec<u8>) -> Vec<String> {
        String::from_utf8(csv)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_rows_follow_rank_with_unranked_last() {
        let submissions = vec![
            submission(1, "Pending", None, None),
            submission(2, "Second", Some(70.0), Some(2)),
            submission(3, "First", Some(90.5), Some(1)),
        ];

        let lines = lines(results_csv(&submissions).unwrap());

        assert_eq!(
            lines[0],
            "TeamName,Keywords,Summary,Strengths,Weaknesses,Score,Rank"
        );
        assert_eq!(lines[1], "First,N/A,N/A,N/A,N/A,90.5,1");
        assert_eq!(lines[2], "Second,N/A,N/A,N/A,N/A,70,2");
        assert_eq!(lines[3], "Pending,N/A,N/A,N/A,N/A,N/A,N/A");
    }

    #[test]
    fn test_criteria_columns_and_quoting() {
        let mut first = submission(1, "Solar, Inc", Some(80.0), Some(1));
        first.keywords = Some(Json(vec!["solar".to_string(), "iot".to_string()]));
        first.summary = Some("Says \"hi\"".to_string());
        first.criteria_scores = Some(Json(BTreeMap::from([("Impact".to_string(), 8.0)])));
        let mut second = submission(2, "Wind", Some(60.0), Some(2));
        second.criteria_scores = Some(Json(BTreeMap::from([("Design".to_string(), 6.5)])));

        let lines = lines(results_csv(&[first, second]).unwrap());

        assert_eq!(
            lines[0],
            "TeamName,Keywords,Summary,Strengths,Weaknesses,Score,Rank,Criteria: Design,Criteria: Impact"
        );
        assert_eq!(
            lines[1],
            r#""Solar, Inc","solar, iot","Says ""hi""",N/A,N/A,80,1,,8"#
        );
        assert_eq!(lines[2], "Wind,N/A,N/A,N/A,N/A,60,2,6.5,");
    }

    #[test]
    fn test_empty_hackathon_has_header_only() {
        let lines = lines(results_csv(&[]).unwrap());
        assert_eq!(lines.len(), 1);
    }
}
