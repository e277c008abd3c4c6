use sqlx::PgPool;

use crate::dto::ranking::LeaderboardEntry;
use crate::error::Result;
use crate::models::Submission;
use crate::repository::hackathon::HackathonRepository;
use crate::repository::submission::SubmissionRepository;
use crate::services::ranking::rank_submissions;

/// Recompute and persist the ranks of every evaluated submission of a hackathon.
///
/// Unevaluated submissions are left unranked. Returns the ranked submissions in
/// leaderboard order.
pub async fn rerank_hackathon(pool: &PgPool, hackathon_id: i32) -> Result<Vec<Submission>> {
    HackathonRepository::new(pool).find_by_id(hackathon_id).await?;

    let repo = SubmissionRepository::new(pool);
    let evaluated = repo.list_evaluated(hackathon_id).await?;

    let ranked = rank_submissions(evaluated)?;
    let ranks: Vec<(i32, i32)> = ranked
        .iter()
        .filter_map(|s| s.rank.map(|rank| (s.id, rank)))
        .collect();

    repo.replace_ranks(hackathon_id, &ranks).await?;

    tracing::info!(
        "Ranked {} evaluated submissions for hackathon {}",
        ranks.len(),
        hackathon_id
    );

    Ok(ranked)
}

/// Leaderboard view of already ranked submissions
pub fn leaderboard_of(ranked: &[Submission]) -> Vec<LeaderboardEntry> {
    ranked.iter().filter_map(LeaderboardEntry::from_ranked).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::Database;
    use crate::dto::hackathon::CreateHackathonRequest;
    use crate::dto::submission::{NewSubmission, SubmissionEvaluation};
    use crate::models::FileType;

    fn evaluation(score: f64) -> SubmissionEvaluation {
        SubmissionEvaluation {
            score,
            justification: Some("ok".to_string()),
            criteria_scores: BTreeMap::from([("Impact".to_string(), score / 10.0)]),
            summary: None,
            keywords: vec![],
            strengths: vec![],
            weaknesses: vec![],
        }
    }

    #[tokio::test]
    #[ignore] // Only run against a migrated database in DATABASE_URL
    async fn test_rerank_persists_competition_ranks() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        let pool = db.pool();

        let hackathon = HackathonRepository::new(pool)
            .create(&CreateHackathonRequest {
                name: format!("rerank-{}", uuid::Uuid::new_v4()),
                theme: "Testing".to_string(),
                description: String::new(),
                criteria: vec![],
                status: None,
            })
            .await
            .unwrap();

        let repo = SubmissionRepository::new(pool);
        let mut ids = Vec::new();
        for team in ["alpha", "beta", "gamma", "delta"] {
            let submission = repo
                .create(&NewSubmission {
                    hackathon_id: hackathon.id,
                    team_name: team.to_string(),
                    original_file: format!("{}_x.txt", team),
                    file_type: FileType::Text,
                    bucket_name: FileType::Text.bucket_name(),
                    object_key: format!("{}-{}", uuid::Uuid::new_v4(), team),
                    content: Some("hello".to_string()),
                })
                .await
                .unwrap();
            ids.push(submission.id);
        }

        repo.apply_evaluation(ids[0], &evaluation(90.0)).await.unwrap();
        repo.apply_evaluation(ids[1], &evaluation(90.0)).await.unwrap();
        repo.apply_evaluation(ids[2], &evaluation(70.0)).await.unwrap();

        let ranked = rerank_hackathon(pool, hackathon.id).await.unwrap();
        let ranks: Vec<(i32, Option<i32>)> = ranked.iter().map(|s| (s.id, s.rank)).collect();
        assert_eq!(
            ranks,
            vec![(ids[0], Some(1)), (ids[1], Some(1)), (ids[2], Some(3))]
        );

        let unevaluated = repo.find_by_id(ids[3]).await.unwrap();
        assert_eq!(unevaluated.rank, None);

        HackathonRepository::new(pool)
            .delete(hackathon.id)
            .await
            .unwrap();
    }
}
