use std::collections::BTreeMap;

use sqlx::{FromRow, PgPool, types::Json};

use crate::dto::common::PaginationParams;
use crate::dto::ranking::LeaderboardEntry;
use crate::error::Result;

#[derive(FromRow)]
struct LeaderboardRow {
    rank: i32,
    id: i32,
    team_name: String,
    score: f64,
    criteria_scores: Option<Json<BTreeMap<String, f64>>>,
    file_type: String,
}

pub struct RankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persisted leaderboard of a hackathon, ordered by rank then ingestion order
    pub async fn get_leaderboard(
        &self,
        hackathon_id: i32,
        pagination: &PaginationParams,
    ) -> Result<(Vec<LeaderboardEntry>, i64)> {
        let total_items = self.count_ranked(hackathon_id).await?;

        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT rank, id, team_name, score, criteria_scores, file_type
            FROM submissions
            WHERE hackathon_id = $1 AND evaluated AND rank IS NOT NULL AND score IS NOT NULL
            ORDER BY rank, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(hackathon_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                rank: row.rank,
                submission_id: row.id,
                team_name: row.team_name,
                score: row.score,
                criteria_scores: row.criteria_scores.map(|j| j.0).unwrap_or_default(),
                file_type: row.file_type,
            })
            .collect();

        Ok((entries, total_items))
    }

    async fn count_ranked(&self, hackathon_id: i32) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM submissions
            WHERE hackathon_id = $1 AND evaluated AND rank IS NOT NULL AND score IS NOT NULL
            "#,
        )
        .bind(hackathon_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
