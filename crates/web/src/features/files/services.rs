use sqlx::PgPool;
use storage::{
    dto::file::{FileListFilter, NewStoredFile},
    error::Result,
    models::{FileType, StoredFile, StoredObject, extension_of},
    repository::{file::FileRepository, object::ObjectRepository},
    services::ingest::object_key_for,
};

use crate::features::upload::UploadedFile;

pub async fn list_files(pool: &PgPool, filter: &FileListFilter) -> Result<Vec<StoredFile>> {
    let repo = FileRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_file(pool: &PgPool, id: i32) -> Result<StoredFile> {
    let repo = FileRepository::new(pool);
    repo.find_by_id(id).await
}

/// Metadata row and its stored bytes
pub async fn get_file_object(pool: &PgPool, id: i32) -> Result<(StoredFile, StoredObject)> {
    let file = FileRepository::new(pool).find_by_id(id).await?;
    let object = ObjectRepository::new(pool)
        .get(&file.bucket_name, &file.filename)
        .await?;
    Ok((file, object))
}

/// Checks that the upload's extension belongs to the declared format family
pub fn prepare_file(upload: &UploadedFile, file_type: &str) -> std::result::Result<NewStoredFile, String> {
    let file_type: FileType = file_type.parse()?;

    let extension = extension_of(&upload.file_name)
        .ok_or_else(|| format!("{} has no file extension", upload.file_name))?;
    if !file_type.supports_extension(extension) {
        return Err(format!(
            "Invalid file type. Allowed types for {}: {}",
            file_type,
            file_type.extensions().join(", ")
        ));
    }

    let mime_type = upload
        .content_type
        .clone()
        .filter(|m| !m.is_empty() && m != "application/octet-stream")
        .unwrap_or_else(|| file_type.default_mime_type().to_string());

    Ok(NewStoredFile {
        filename: object_key_for(&upload.file_name),
        original_name: upload.file_name.clone(),
        file_type,
        mime_type,
        size: upload.size(),
    })
}

/// Store the bytes, then the metadata
pub async fn store_file(pool: &PgPool, new: &NewStoredFile, upload: &UploadedFile) -> Result<StoredFile> {
    let objects = ObjectRepository::new(pool);
    let bucket = new.bucket_name();

    objects
        .put(&bucket, &new.filename, &new.mime_type, &upload.data)
        .await?;

    match FileRepository::new(pool).create(new).await {
        Ok(file) => {
            tracing::info!("Uploaded {} to {}", file.original_name, file.path);
            Ok(file)
        }
        Err(e) => {
            if let Err(cleanup) = objects.remove(&bucket, &new.filename).await {
                tracing::warn!("Failed to remove orphaned object: {}", cleanup);
            }
            Err(e)
        }
    }
}

/// Delete the metadata; a missing or undeletable object is only logged
pub async fn delete_file(pool: &PgPool, id: i32) -> Result<()> {
    let repo = FileRepository::new(pool);
    let file = repo.find_by_id(id).await?;

    if let Err(e) = ObjectRepository::new(pool)
        .remove(&file.bucket_name, &file.filename)
        .await
    {
        tracing::warn!("Error deleting object {}: {}", file.path, e);
    }

    repo.delete(id).await
}

/// `Content-Disposition` value with the original name reduced to safe ASCII
pub fn content_disposition(disposition: &str, original_name: &str) -> String {
    let name: String = original_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}; filename=\"{}\"", disposition, name)
}
