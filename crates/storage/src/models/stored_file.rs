use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    pub id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_type: String,
    pub mime_type: String,
    pub size: i64,
    pub bucket_name: String,
    pub path: String,
    pub uploaded_at: chrono::NaiveDateTime,
}
