use sqlx::{PgPool, types::Json};

use crate::dto::hackathon::CreateHackathonRequest;
use crate::error::{Result, StorageError};
use crate::models::{Hackathon, HackathonStatus};

const HACKATHON_COLUMNS: &str = "id, name, theme, description, criteria, status, created_at";

/// Repository for Hackathon database operations
pub struct HackathonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HackathonRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all hackathons, newest first
    pub async fn list(&self) -> Result<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(hackathons)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Hackathon> {
        sqlx::query_as::<_, Hackathon>(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a new hackathon; names are unique
    pub async fn create(&self, req: &CreateHackathonRequest) -> Result<Hackathon> {
        let status = req.status.unwrap_or(HackathonStatus::NotStarted);

        sqlx::query_as::<_, Hackathon>(&format!(
            r#"
            INSERT INTO hackathons (name, theme, description, criteria, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HACKATHON_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(&req.theme)
        .bind(&req.description)
        .bind(Json(&req.criteria))
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A hackathon with this name already exists".to_string(),
                )
            } else {
                err
            }
        })
    }

    pub async fn update_status(&self, id: i32, status: HackathonStatus) -> Result<Hackathon> {
        sqlx::query_as::<_, Hackathon>(&format!(
            "UPDATE hackathons SET status = $2 WHERE id = $1 RETURNING {HACKATHON_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Atomically move a hackathon into `evaluating`.
    ///
    /// Fails with a constraint violation when another evaluation already holds it.
    pub async fn begin_evaluation(&self, id: i32) -> Result<Hackathon> {
        let claimed = sqlx::query_as::<_, Hackathon>(&format!(
            r#"
            UPDATE hackathons SET status = $2
            WHERE id = $1 AND status <> $2
            RETURNING {HACKATHON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(HackathonStatus::Evaluating.as_str())
        .fetch_optional(self.pool)
        .await?;

        match claimed {
            Some(hackathon) => Ok(hackathon),
            None => {
                // Either the row is gone or someone else is evaluating it
                self.find_by_id(id).await?;
                Err(StorageError::ConstraintViolation(
                    "Hackathon is already being evaluated".to_string(),
                ))
            }
        }
    }

    /// Delete a hackathon; its submissions are removed by cascade
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM hackathons WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    #[ignore] // Only run against a migrated database in DATABASE_URL
    async fn test_second_begin_evaluation_rejected() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();
        let repo = HackathonRepository::new(db.pool());

        let hackathon = repo
            .create(&CreateHackathonRequest {
                name: format!("claim-{}", uuid::Uuid::new_v4()),
                theme: "Testing".to_string(),
                description: String::new(),
                criteria: vec![],
                status: Some(HackathonStatus::InProgress),
            })
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            repo.begin_evaluation(hackathon.id),
            repo.begin_evaluation(hackathon.id)
        );
        let claimed = [first.is_ok(), second.is_ok()];
        assert_eq!(claimed.iter().filter(|ok| **ok).count(), 1);

        let third = repo.begin_evaluation(hackathon.id).await;
        assert!(matches!(third, Err(StorageError::ConstraintViolation(_))));

        let stored = repo.find_by_id(hackathon.id).await.unwrap();
        assert_eq!(stored.status, HackathonStatus::Evaluating.as_str());

        repo.update_status(hackathon.id, HackathonStatus::InProgress)
            .await
            .unwrap();
        assert!(repo.begin_evaluation(hackathon.id).await.is_ok());

        repo.delete(hackathon.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Only run against a migrated database in DATABASE_URL
    async fn test_begin_evaluation_unknown_hackathon() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url).await.unwrap();
        db.run_migrations().await.unwrap();

        let result = HackathonRepository::new(db.pool())
            .begin_evaluation(i32::MAX)
            .await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }
}
