use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::StoredObject;

/// Bucket/key object storage kept in PostgreSQL
pub struct ObjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ObjectRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store `data` under `(bucket, key)`, replacing any previous object
    pub async fn put(&self, bucket: &str, key: &str, content_type: &str, data: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stored_objects (bucket, object_key, content_type, data, size)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (bucket, object_key) DO UPDATE
            SET content_type = EXCLUDED.content_type,
                data = EXCLUDED.data,
                size = EXCLUDED.size,
                created_at = NOW()
            "#,
        )
        .bind(bucket)
        .bind(key)
        .bind(content_type)
        .bind(data)
        .bind(data.len() as i64)
        .execute(self.pool)
        .await?;

        tracing::debug!("Stored object {}/{} ({} bytes)", bucket, key, data.len());
        Ok(())
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        sqlx::query_as::<_, StoredObject>(
            r#"
            SELECT bucket, object_key, content_type, data, size, created_at
            FROM stored_objects
            WHERE bucket = $1 AND object_key = $2
            "#,
        )
        .bind(bucket)
        .bind(key)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn remove(&self, bucket: &str, key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM stored_objects WHERE bucket = $1 AND object_key = $2")
            .bind(bucket)
            .bind(key)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::debug!("Removed object {}/{}", bucket, key);
        Ok(())
    }
}
