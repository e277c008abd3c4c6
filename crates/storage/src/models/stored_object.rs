use sqlx::FromRow;

/// A blob held in a bucket, addressed by `(bucket, object_key)`.
#[derive(Debug, Clone, FromRow)]
pub struct StoredObject {
    pub bucket: String,
    pub object_key: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub size: i64,
    pub created_at: chrono::NaiveDateTime,
}
