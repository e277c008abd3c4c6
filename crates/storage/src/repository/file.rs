use sqlx::{PgPool, QueryBuilder};

use crate::dto::file::{FileListFilter, NewStoredFile};
use crate::error::{Result, StorageError};
use crate::models::StoredFile;

const FILE_COLUMNS: &str =
    "id, filename, original_name, file_type, mime_type, size, bucket_name, path, uploaded_at";

/// Repository for file hub metadata
pub struct FileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List files, most recent first
    pub async fn list(&self, filter: &FileListFilter) -> Result<Vec<StoredFile>> {
        let mut query = QueryBuilder::new(format!("SELECT {FILE_COLUMNS} FROM stored_files WHERE 1=1"));

        if let Some(file_type) = filter.file_type {
            query.push(" AND file_type = ");
            query.push_bind(file_type.as_str());
        }

        query.push(" ORDER BY uploaded_at DESC, id DESC");

        let files = query
            .build_query_as::<StoredFile>()
            .fetch_all(self.pool)
            .await?;

        Ok(files)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<StoredFile> {
        sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM stored_files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, new: &NewStoredFile) -> Result<StoredFile> {
        sqlx::query_as::<_, StoredFile>(&format!(
            r#"
            INSERT INTO stored_files (filename, original_name, file_type, mime_type, size, bucket_name, path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(&new.filename)
        .bind(&new.original_name)
        .bind(new.file_type.as_str())
        .bind(&new.mime_type)
        .bind(new.size)
        .bind(new.bucket_name())
        .bind(new.path())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation("File name already exists".to_string())
            } else {
                err
            }
        })
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM stored_files WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
