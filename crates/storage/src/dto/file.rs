use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{FileType, StoredFile};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredFileResponse {
    pub id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_type: String,
    pub mime_type: String,
    pub size: i64,
    pub bucket_name: String,
    pub path: String,
    pub uploaded_at: NaiveDateTime,
}

impl From<StoredFile> for StoredFileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            original_name: file.original_name,
            file_type: file.file_type,
            mime_type: file.mime_type,
            size: file.size,
            bucket_name: file.bucket_name,
            path: file.path,
            uploaded_at: file.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileUploadResponse {
    pub message: String,
    pub file: StoredFileResponse,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FileListFilter {
    /// Only list files of this format family
    pub file_type: Option<FileType>,
}

/// Metadata for a file whose bytes are already in object storage
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    pub filename: String,
    pub original_name: String,
    pub file_type: FileType,
    pub mime_type: String,
    pub size: i64,
}

impl NewStoredFile {
    pub fn bucket_name(&self) -> String {
        self.file_type.bucket_name()
    }

    pub fn path(&self) -> String {
        format!("/{}/{}", self.bucket_name(), self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_uses_type_bucket() {
        let file = NewStoredFile {
            filename: "0f3a-notes.md".to_string(),
            original_name: "notes.md".to_string(),
            file_type: FileType::Text,
            mime_type: "text/markdown".to_string(),
            size: 12,
        };
        assert_eq!(file.bucket_name(), "text-bucket");
        assert_eq!(file.path(), "/text-bucket/0f3a-notes.md");
    }
}
